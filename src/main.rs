fn main() -> Result<(), Box<dyn std::error::Error>> {
    bookchat::cli::main()
}
