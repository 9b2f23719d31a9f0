//! The collection of open datasets and the current selection.

use std::path::Path;

use tracing::info;

use crate::config::{BuildOptions, GuapoConfig};
use crate::error::{GuapoError, Result};
use crate::input::{read_lines, SourceMetadata};
use crate::schema::DataType;

use super::builder::TableBuilder;
use super::table::Dataset;

/// Open datasets plus which one is selected.
///
/// Owned by the caller and passed to whatever needs it; there is no global
/// session.
#[derive(Debug, Clone)]
pub struct Session {
    datasets: Vec<Dataset>,
    current: Option<usize>,
    builder: TableBuilder,
    config: GuapoConfig,
}

impl Session {
    /// Create an empty session with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GuapoConfig::default())
    }

    /// Create an empty session that builds datasets with `config`.
    pub fn with_config(config: GuapoConfig) -> Self {
        Self {
            datasets: Vec::new(),
            current: None,
            builder: TableBuilder::from_config(&config.inference),
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &GuapoConfig {
        &self.config
    }

    /// Build a dataset from raw lines, append it and select it.
    pub fn open<S: AsRef<str>>(
        &mut self,
        name: impl Into<String>,
        lines: &[S],
        options: &BuildOptions,
    ) -> Result<usize> {
        let mut dataset = self.builder.build(lines, options)?;
        dataset.rename(name);
        Ok(self.push(dataset))
    }

    /// Read a file and open it with the configured build options. The dataset
    /// is named after the file stem.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<(usize, SourceMetadata)> {
        let path = path.as_ref();
        let (lines, metadata) = read_lines(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| metadata.file.clone());

        let options = self.config.build.clone();
        let index = self.open(name, &lines, &options)?;
        Ok((index, metadata))
    }

    /// Append an already built dataset and select it.
    pub fn push(&mut self, dataset: Dataset) -> usize {
        info!(name = %dataset.name(), "dataset opened");
        self.datasets.push(dataset);
        let index = self.datasets.len() - 1;
        self.current = Some(index);
        index
    }

    /// Select a dataset.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.current = Some(index);
        Ok(())
    }

    /// Index of the selected dataset.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The selected dataset.
    pub fn current(&self) -> Option<&Dataset> {
        self.current.and_then(|i| self.datasets.get(i))
    }

    /// The selected dataset, mutably.
    pub fn current_mut(&mut self) -> Option<&mut Dataset> {
        self.current.and_then(|i| self.datasets.get_mut(i))
    }

    pub fn get(&self, index: usize) -> Result<&Dataset> {
        self.check(index)?;
        Ok(&self.datasets[index])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Dataset> {
        self.check(index)?;
        Ok(&mut self.datasets[index])
    }

    /// Remove a dataset and return it.
    ///
    /// The selection follows the dataset it pointed at; removing the
    /// selected dataset selects its predecessor, or nothing if none remain.
    pub fn remove(&mut self, index: usize) -> Result<Dataset> {
        self.check(index)?;
        let removed = self.datasets.remove(index);

        self.current = match self.current {
            _ if self.datasets.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) if current == index => Some(index.saturating_sub(1)),
            other => other,
        };

        info!(name = %removed.name(), "dataset removed");
        Ok(removed)
    }

    /// Rename a dataset.
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.get_mut(index)?.rename(name);
        Ok(())
    }

    /// Declared type of a column in a dataset.
    pub fn column_type(&self, index: usize, column: usize) -> Result<DataType> {
        self.get(index)?.column_type(column)
    }

    /// All open datasets in opening order.
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.datasets.len() {
            Ok(())
        } else {
            Err(GuapoError::IndexOutOfRange {
                kind: "dataset",
                index,
                len: self.datasets.len(),
            })
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
