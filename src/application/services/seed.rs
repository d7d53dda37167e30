//! Seed and script loading
//!
//! Reads boards, forests and action scripts from TOML or JSON files. The
//! format is picked by extension: `.json` is JSON, anything else TOML.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::actions::ActionScript;
use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Board, Forest, NodeSeed};
use crate::infrastructure::traits::FileSystem;

/// On-disk shape of a forest seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestFile {
    #[serde(default)]
    pub nodes: Vec<NodeSeed>,
}

pub struct SeedService {
    fs: Arc<dyn FileSystem>,
}

impl SeedService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_board(&self, path: &Path) -> ApplicationResult<Board> {
        let board: Board = self.parse(path)?;
        debug!("loaded board: {} columns", board.columns().len());
        Ok(board)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_forest(&self, path: &Path) -> ApplicationResult<Forest> {
        let file: ForestFile = self.parse(path)?;
        let forest = Forest::from_seeds(&file.nodes)?;
        debug!("loaded forest: {} nodes", forest.len());
        Ok(forest)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_script<A: DeserializeOwned>(&self, path: &Path) -> ApplicationResult<Vec<A>> {
        let script: ActionScript<A> = self.parse(path)?;
        Ok(script.actions)
    }

    fn parse<T: DeserializeOwned>(&self, path: &Path) -> ApplicationResult<T> {
        let content = self.fs.read_to_string(path).with_path_context("read", path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ApplicationError::Seed {
            path: path.to_path_buf(),
            message,
        })
    }
}
