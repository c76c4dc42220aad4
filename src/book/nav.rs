use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::data::path_display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavItem {
    Category { label: String, items: Vec<NavItem> },
    Doc { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTree {
    #[serde(default)]
    pub sidebar: Vec<NavItem>,
    #[serde(default)]
    pub footer: Vec<FooterLink>,
}

#[derive(Debug)]
pub enum NavError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::Read { path, source } => write!(
                f,
                "Failed to read navigation file {}: {}",
                path_display(path),
                source
            ),
            NavError::Parse { path, source } => write!(
                f,
                "Failed to parse navigation file {}: {}",
                path_display(path),
                source
            ),
        }
    }
}

impl StdError for NavError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            NavError::Read { source, .. } => Some(source),
            NavError::Parse { source, .. } => Some(source),
        }
    }
}

fn category(label: &str, ids: &[&str]) -> NavItem {
    NavItem::Category {
        label: label.to_string(),
        items: ids
            .iter()
            .map(|id| NavItem::Doc { id: id.to_string() })
            .collect(),
    }
}

impl NavTree {
    /// The book's own sidebar and footer.
    pub fn builtin() -> Self {
        Self {
            sidebar: vec![
                category("Introduction", &["intro"]),
                category(
                    "Module 1: The Robotic Nervous System (ROS 2)",
                    &[
                        "module-1-ros2/week-1-2-intro-physical-ai",
                        "module-1-ros2/week-3-ros2-fundamentals",
                        "module-1-ros2/week-4-advanced-ros2",
                    ],
                ),
                category(
                    "Module 2: The Digital Twin (Gazebo & Unity)",
                    &[
                        "module-2-digital-twin/week-6-7-gazebo-unity",
                        "module-2-digital-twin/simulation-concepts",
                    ],
                ),
                category(
                    "Module 3: The AI-Robot Brain (NVIDIA Isaac)",
                    &[
                        "module-3-ai-brain/week-8-10-isaac-platform",
                        "module-3-ai-brain/week-11-12-humanoid-dev",
                        "module-3-ai-brain/week-13-conversational-robotics",
                    ],
                ),
                category(
                    "Module 4: Vision-Language-Action (VLA)",
                    &[
                        "module-4-vla/week-13-vla-concepts",
                        "module-4-vla/week-13-vla-intro",
                        "module-4-vla/week-14-voice-command-intro",
                        "module-4-vla/multimodal-integration-challenges",
                        "module-4-vla/cross-modal-attention-math",
                        "module-4-vla/gpt-model-applications",
                        "module-4-vla/cognitive-planning-voice-commands",
                        "module-4-vla/language-model-math",
                        "module-4-vla/hri-design-principles-intro",
                        "module-4-vla/hri-speech-recognition",
                        "module-4-vla/gesture-vision-integration",
                        "module-4-vla/multimodal-fusion-math",
                        "module-4-vla/llm-possibilities-intro",
                        "module-4-vla/llm-limitations-robot-control",
                        "module-4-vla/llm-safety-considerations",
                        "module-4-vla/llm-uncertainty-math",
                        "module-4-vla/vla-index",
                        "module-4-vla/vla-glossary",
                        "module-4-vla/quick-reference-guides",
                        "module-4-vla/phase-7-validation",
                    ],
                ),
            ],
            footer: [
                (
                    "Module 1: The Robotic Nervous System (ROS 2)",
                    "/docs/module-1-ros2/week-1-2-intro-physical-ai",
                ),
                (
                    "Module 2: The Digital Twin (Gazebo & Unity)",
                    "/docs/module-2-digital-twin/week-6-7-gazebo-unity",
                ),
                (
                    "Module 3: The AI-Robot Brain (NVIDIA Isaac)",
                    "/docs/module-3-ai-brain/week-8-10-isaac-platform",
                ),
                (
                    "Module 4: Vision-Language-Action (VLA)",
                    "/docs/module-4-vla/week-13-vla-concepts",
                ),
            ]
            .into_iter()
            .map(|(label, href)| FooterLink {
                label: label.to_string(),
                href: href.to_string(),
            })
            .collect(),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, NavError> {
        let contents = fs::read_to_string(path).map_err(|source| NavError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| NavError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Lesson ids in reading order.
    pub fn doc_ids(&self) -> Vec<&str> {
        fn walk<'a>(items: &'a [NavItem], out: &mut Vec<&'a str>) {
            for item in items {
                match item {
                    NavItem::Doc { id } => out.push(id),
                    NavItem::Category { items, .. } => walk(items, out),
                }
            }
        }

        let mut ids = Vec::new();
        walk(&self.sidebar, &mut ids);
        ids
    }

    /// Indented outline, two spaces per level.
    pub fn render_lines(&self) -> Vec<String> {
        fn walk(items: &[NavItem], depth: usize, out: &mut Vec<String>) {
            let indent = "  ".repeat(depth);
            for item in items {
                match item {
                    NavItem::Category { label, items } => {
                        out.push(format!("{indent}{label}"));
                        walk(items, depth + 1, out);
                    }
                    NavItem::Doc { id } => out.push(format!("{indent}• {id}")),
                }
            }
        }

        let mut lines = Vec::new();
        walk(&self.sidebar, 0, &mut lines);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_tree_lists_lessons_in_order() {
        let tree = NavTree::builtin();
        let ids = tree.doc_ids();
        assert_eq!(ids.first(), Some(&"intro"));
        assert_eq!(ids.last(), Some(&"module-4-vla/phase-7-validation"));
        assert_eq!(ids.len(), 29);
        assert!(ids.contains(&"module-2-digital-twin/simulation-concepts"));
        assert!(!ids.contains(&"module-5"));
    }

    #[test]
    fn render_lines_indents_lessons_under_categories() {
        let lines = NavTree::builtin().render_lines();
        assert_eq!(lines[0], "Introduction");
        assert_eq!(lines[1], "  • intro");
        assert_eq!(lines[2], "Module 1: The Robotic Nervous System (ROS 2)");
    }

    #[test]
    fn loads_tree_from_toml() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nav.toml");
        std::fs::write(
            &path,
            r#"
[[sidebar]]
type = "category"
label = "Basics"

[[sidebar.items]]
type = "doc"
id = "basics/kinematics"

[[footer]]
label = "Home"
href = "/"
"#,
        )
        .expect("write nav file");

        let tree = NavTree::load_from_path(&path).expect("valid nav file");
        assert_eq!(tree.doc_ids(), vec!["basics/kinematics"]);
        assert_eq!(tree.footer.len(), 1);
    }

    #[test]
    fn missing_nav_file_is_a_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let err = NavTree::load_from_path(&temp_dir.path().join("missing.toml"))
            .expect_err("file does not exist");
        assert!(matches!(err, NavError::Read { .. }));
    }
}
