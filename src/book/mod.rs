//! Declarative description of the book: its title and its navigation tree.

pub mod nav;

pub use nav::{FooterLink, NavError, NavItem, NavTree};

/// Site metadata shown alongside the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInfo {
    pub title: String,
    pub tagline: String,
}
