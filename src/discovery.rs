//! Discovery of component sources on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// A source file and where its preview page goes, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSource {
    pub path: PathBuf,
    pub page: PathBuf,
}

impl ComponentSource {
    fn new(path: PathBuf, relative: &Path) -> Self {
        ComponentSource {
            page: relative.with_extension("html"),
            path,
        }
    }
}

pub fn is_component_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| COMPONENT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Recursively collect `.tsx`/`.jsx` files under `dir`, sorted by path.
pub fn find_component_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_component_source(path))
        .collect();
    files.sort();
    files
}

/// Expand a mix of files and directories.
///
/// Pages for a directory's sources keep the directory name and any
/// subdirectories (`a/nested/Card.html`); a file given directly maps to its
/// file name.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<ComponentSource> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let root = input.file_name().map(PathBuf::from).unwrap_or_default();
            for path in find_component_sources(input) {
                let relative = path.strip_prefix(input).unwrap_or(&path).to_path_buf();
                let page = root.join(relative);
                sources.push(ComponentSource::new(path, &page));
            }
        } else {
            let name = input
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("preview"));
            sources.push(ComponentSource::new(input.clone(), &name));
        }
    }
    sources
}

/// First pair of inputs that would write the same page, if any.
pub fn find_page_collision(sources: &[ComponentSource]) -> Option<(&Path, &Path)> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for source in sources {
        if let Some(first) = seen.insert(source.page.as_path(), source.path.as_path()) {
            return Some((first, source.path.as_path()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("preview-{}-{}", name, std::process::id()));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_extension_filter() {
        assert!(is_component_source(Path::new("App.tsx")));
        assert!(is_component_source(Path::new("src/Card.jsx")));
        assert!(!is_component_source(Path::new("index.ts")));
        assert!(!is_component_source(Path::new("README")));
    }

    #[test]
    fn test_find_sorted_sources() {
        let dir = scratch_dir("discovery");
        let nested = dir.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.join("b.tsx"), "").unwrap();
        fs::write(nested.join("a.jsx"), "").unwrap();
        fs::write(dir.join("notes.md"), "").unwrap();

        let found = find_component_sources(&dir);
        fs::remove_dir_all(&dir).ok();

        assert_eq!(found, vec![dir.join("b.tsx"), nested.join("a.jsx")]);
    }

    #[test]
    fn test_same_stem_in_two_directories_gets_two_pages() {
        let dir = scratch_dir("pages");
        for sub in ["a", "b"] {
            fs::create_dir_all(dir.join(sub).join("nested")).unwrap();
            fs::write(dir.join(sub).join("App.tsx"), "").unwrap();
        }
        fs::write(dir.join("a").join("nested").join("App.jsx"), "").unwrap();

        let sources = expand_inputs(&[dir.join("a"), dir.join("b")]);
        fs::remove_dir_all(&dir).ok();

        let pages: Vec<PathBuf> = sources.iter().map(|s| s.page.clone()).collect();
        assert_eq!(
            pages,
            vec![
                PathBuf::from("a/App.html"),
                PathBuf::from("a/nested/App.html"),
                PathBuf::from("b/App.html"),
            ]
        );
        assert!(find_page_collision(&sources).is_none());
    }

    #[test]
    fn test_direct_files_with_same_name_collide() {
        let sources = expand_inputs(&[
            PathBuf::from("x/App.tsx"),
            PathBuf::from("y/Card.tsx"),
            PathBuf::from("z/App.jsx"),
        ]);
        assert_eq!(sources[0].page, PathBuf::from("App.html"));

        let (first, second) = find_page_collision(&sources).unwrap();
        assert_eq!(first, Path::new("x/App.tsx"));
        assert_eq!(second, Path::new("z/App.jsx"));
    }
}
