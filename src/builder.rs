use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::defaults::DefaultLoader;
use crate::env::EnvLoader;
use crate::error::TagfigError;
use crate::field::Record;
use crate::file::FileLoader;
use crate::types::{CaseMode, Format};
use crate::validate::RequiredValidator;

/// A source of values for a record.
///
/// Loaders mutate the record in place. A failing loader may leave fields it
/// already set behind; the orchestrator stops at the first error.
pub trait Loader<R> {
    fn load(&mut self, record: &mut R) -> Result<(), TagfigError>;
}

/// A check run after every loader has finished.
pub trait Validator<R> {
    fn validate(&self, record: &mut R) -> Result<(), TagfigError>;
}

/// Entry point for building a tagfig pipeline.
pub struct Tagfig;

impl Tagfig {
    pub fn builder<R: Record>() -> TagfigBuilder<R> {
        TagfigBuilder::new()
    }

    /// The conventional pipeline:
    ///
    /// 1. `default` tags
    /// 2. `config_file`, when its extension names a known format (`.json`,
    ///    `.yaml`/`.yml`, `.toml`); otherwise no file is read
    /// 3. environment variables under `env_prefix`, snake-cased
    /// 4. `required` tags
    pub fn standard<R>(config_file: impl AsRef<Path>, env_prefix: &str) -> TagfigBuilder<R>
    where
        R: Record + Serialize + DeserializeOwned,
    {
        let config_file = config_file.as_ref();
        let mut builder = Self::builder::<R>().loader(DefaultLoader::new());

        if Format::from_path(config_file).is_some() {
            builder = builder.loader(FileLoader::path(config_file));
        }

        builder
            .loader(EnvLoader::new().prefix(env_prefix).case(CaseMode::Snake))
            .validator(RequiredValidator::new())
    }
}

/// Ordered loaders and validators for one record type.
///
/// [`load()`](Self::load) runs every loader in registration order, then every
/// validator. Later loaders take precedence over earlier ones wherever they
/// supply a value.
pub struct TagfigBuilder<R> {
    loaders: Vec<Box<dyn Loader<R>>>,
    validators: Vec<Box<dyn Validator<R>>>,
}

impl<R: Record> TagfigBuilder<R> {
    fn new() -> Self {
        Self {
            loaders: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn loader(mut self, loader: impl Loader<R> + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    pub fn validator(mut self, validator: impl Validator<R> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Run every loader, in order, against `record`.
    pub fn run_loaders(&mut self, record: &mut R) -> Result<(), TagfigError> {
        for (index, loader) in self.loaders.iter_mut().enumerate() {
            if let Err(e) = loader.load(record) {
                error!(event = "tagfig.load.loader_failed", index = index, error = %e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Run every validator, in order, against `record`.
    pub fn validate(&self, record: &mut R) -> Result<(), TagfigError> {
        for (index, validator) in self.validators.iter().enumerate() {
            if let Err(e) = validator.validate(record) {
                error!(event = "tagfig.load.validator_failed", index = index, error = %e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Load and validate `record` in place.
    pub fn load(&mut self, record: &mut R) -> Result<(), TagfigError> {
        info!(
            event = "tagfig.load.started",
            loaders = self.loaders.len(),
            validators = self.validators.len(),
        );
        self.run_loaders(record)?;
        self.validate(record)?;
        info!(event = "tagfig.load.completed");
        Ok(())
    }

    /// Load and validate a fresh `R::default()`.
    pub fn load_default(&mut self) -> Result<R, TagfigError>
    where
        R: Default,
    {
        let mut record = R::default();
        self.load(&mut record)?;
        Ok(record)
    }
}
