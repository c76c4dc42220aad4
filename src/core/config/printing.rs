use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.book_id {
            Some(book_id) => println!("  book-id: {book_id}"),
            None => println!("  book-id: (unset)"),
        }
        println!("  default-mode: {}", self.mode());
        let options = self.query_options();
        println!("  max-results: {}", options.max_results);
        println!("  temperature: {}", options.temperature);
        if let Some(nav_file) = &self.nav_file {
            println!("  nav-file: {}", nav_file.display());
        }
        if self.endpoints.is_empty() {
            println!("  endpoints: (none set)");
        } else {
            println!("  endpoints:");
            for endpoint in &self.endpoints {
                let modes = if endpoint.modes.is_empty() {
                    endpoint.shape.default_modes()
                } else {
                    endpoint.modes.as_slice()
                };
                let modes: Vec<&str> = modes.iter().map(|m| m.as_str()).collect();
                println!(
                    "    {}: {} [{}]",
                    endpoint.name,
                    endpoint.url,
                    modes.join(", ")
                );
            }
        }
    }
}
