//! Loads the project configuration from a `tagpages.yaml` file.

use crate::builder::{PathPolicy, TAG_DIRECTORY, TAG_LAYOUT};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file.
pub const PROJECT_FILE: &str = "tagpages.yaml";

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Project {
    documents_directory: PathBuf,
    layouts_directory: PathBuf,
    tag_directory: String,
    tag_layout: String,
    path_policy: PathPolicy,
    site_url: Option<Url>,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            documents_directory: PathBuf::from("_posts"),
            layouts_directory: PathBuf::from("_layouts"),
            tag_directory: TAG_DIRECTORY.to_owned(),
            tag_layout: TAG_LAYOUT.to_owned(),
            path_policy: PathPolicy::default(),
            site_url: None,
        }
    }
}

/// Everything the CLI needs to generate and write a site's tag pages: the
/// project file's settings with paths resolved against the site root, plus
/// the command-line overrides.
pub struct Config {
    /// The directory containing the project file.
    pub site_root: PathBuf,
    pub documents_directory: PathBuf,

    /// Relative to `site_root` unless absolute.
    pub layouts_directory: PathBuf,
    pub output_directory: PathBuf,
    pub tag_directory: String,
    pub tag_layout: String,
    pub path_policy: PathPolicy,
    pub site_url: Option<Url>,
    pub threads: usize,
}

impl Config {
    /// Searches `dir` and its ancestors for a project file and loads the first
    /// one found.
    pub fn from_directory(
        dir: &Path,
        output_directory: Option<&Path>,
        threads: Option<usize>,
    ) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            match Config::from_project_file(&path, output_directory, threads) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory, threads),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads a project file. The output directory defaults to `_site` next to
    /// the project file, and the thread count to the number of CPUs.
    pub fn from_project_file(
        path: &Path,
        output_directory: Option<&Path>,
        threads: Option<usize>,
    ) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Reading project file `{}`: {}", path.display(), e))?;
        // An empty project file means "all defaults".
        let project: Project = if contents.trim().is_empty() {
            log::debug!("Empty project file `{}`", path.display());
            Project::default()
        } else {
            serde_yaml::from_str(&contents)?
        };
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(site_root) => Ok(Config {
                site_root: site_root.to_owned(),
                documents_directory: site_root.join(project.documents_directory),
                layouts_directory: project.layouts_directory,
                output_directory: match output_directory {
                    Some(dir) => dir.to_owned(),
                    None => site_root.join("_site"),
                },
                tag_directory: project.tag_directory,
                tag_layout: project.tag_layout,
                path_policy: project.path_policy,
                site_url: project.site_url,
                threads: match threads {
                    None => num_cpus::get(),
                    Some(threads) => threads,
                },
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_directory_searches_parents() -> Result<()> {
        let site = tempfile::tempdir()?;
        fs::write(
            site.path().join(PROJECT_FILE),
            "path_policy: slugify\nsite_url: https://example.org/blog/\ntag_directory: tags\n",
        )?;
        let nested = site.path().join("_posts").join("2021");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested, None, Some(2))?;
        assert_eq!(site.path(), config.site_root);
        assert_eq!(site.path().join("_posts"), config.documents_directory);
        assert_eq!(Path::new("_layouts"), config.layouts_directory);
        assert_eq!(site.path().join("_site"), config.output_directory);
        assert_eq!("tags", config.tag_directory);
        assert_eq!(TAG_LAYOUT, config.tag_layout);
        assert_eq!(PathPolicy::Slugify, config.path_policy);
        assert_eq!(
            Some("https://example.org/blog/"),
            config.site_url.as_ref().map(Url::as_str)
        );
        assert_eq!(2, config.threads);
        Ok(())
    }

    #[test]
    fn test_empty_project_file() -> Result<()> {
        let site = tempfile::tempdir()?;
        let path = site.path().join(PROJECT_FILE);
        fs::write(&path, "")?;
        let output = site.path().join("out");

        let config = Config::from_project_file(&path, Some(&output), None)?;
        assert_eq!(PathPolicy::Verbatim, config.path_policy);
        assert_eq!(TAG_DIRECTORY, config.tag_directory);
        assert_eq!(output, config.output_directory);
        assert!(config.threads >= 1);
        Ok(())
    }

    #[test]
    fn test_unknown_fields_are_rejected() -> Result<()> {
        let site = tempfile::tempdir()?;
        let path = site.path().join(PROJECT_FILE);
        fs::write(&path, "tag_dir: tags\n")?;
        assert!(Config::from_project_file(&path, None, None).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_project_file() -> Result<()> {
        let site = tempfile::tempdir()?;
        let path = site.path().join(PROJECT_FILE);
        match Config::from_project_file(&path, None, None) {
            Err(e) => assert!(
                e.to_string().starts_with("Reading project file"),
                "unexpected error: {}",
                e
            ),
            Ok(_) => panic!("wanted an error for a missing project file"),
        }
        Ok(())
    }

    #[test]
    fn test_whitespace_project_file() -> Result<()> {
        let site = tempfile::tempdir()?;
        let path = site.path().join(PROJECT_FILE);
        fs::write(&path, "\n  \n")?;
        let config = Config::from_project_file(&path, None, Some(1))?;
        assert_eq!(site.path().join("_posts"), config.documents_directory);
        Ok(())
    }
}
