//! Writing the generated C++ and handing it to the native compiler.
//!
//! The output directory is owned by the translator: its contents are
//! removed before every run. Whether a build succeeded is decided only by
//! the presence of the binary afterwards.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("failed to prepare output directory '{}'", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the translation unit goes and how it is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub out_dir: PathBuf,
    pub source_name: String,
    pub binary_name: String,
    pub compiler: String,
    pub flags: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            out_dir: PathBuf::from("out"),
            source_name: String::from("main.cpp"),
            binary_name: String::from("main"),
            compiler: String::from("g++"),
            flags: vec![String::from("-std=c++17")],
        }
    }
}

impl BuildConfig {
    pub fn source_path(&self) -> PathBuf {
        self.out_dir.join(&self.source_name)
    }

    pub fn binary_path(&self) -> PathBuf {
        self.out_dir.join(&self.binary_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Built { binary: PathBuf },
    Failed { compiler: String, output: String },
}

/// Creates `dir` if needed and removes everything inside it.
pub fn clear_output_dir(dir: &Path) -> Result<(), ToolchainError> {
    let wrap = |source| ToolchainError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(wrap)?;

    for entry in fs::read_dir(dir).map_err(wrap)? {
        let path = entry.map_err(wrap)?.path();

        if path.is_dir() {
            fs::remove_dir_all(&path).map_err(wrap)?;
        } else {
            fs::remove_file(&path).map_err(wrap)?;
        }
    }

    debug!(dir = %dir.display(), "cleared output directory");
    Ok(())
}

/// Clears the output directory and writes `code` as the translation unit.
pub fn write_output(config: &BuildConfig, code: &str) -> Result<PathBuf, ToolchainError> {
    clear_output_dir(&config.out_dir)?;

    let path = config.source_path();
    fs::write(&path, code).map_err(|source| ToolchainError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), bytes = code.len(), "wrote translation unit");
    Ok(path)
}

/// Runs the native compiler on the written translation unit. Blocks until
/// the compiler exits.
pub fn build(config: &BuildConfig) -> BuildOutcome {
    let binary = config.binary_path();

    let result = Command::new(&config.compiler)
        .args(&config.flags)
        .arg(config.source_path())
        .arg("-o")
        .arg(&binary)
        .output();

    let output = match result {
        Ok(output) => String::from_utf8_lossy(&output.stderr).into_owned(),
        Err(error) => {
            warn!(compiler = %config.compiler, %error, "could not run compiler");
            error.to_string()
        }
    };

    if binary.exists() {
        info!(binary = %binary.display(), "build succeeded");
        BuildOutcome::Built { binary }
    } else {
        BuildOutcome::Failed {
            compiler: config.compiler.clone(),
            output,
        }
    }
}
