//! # Tokenizer File Pairs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::LLResult,
    export::{encode_vocab, load_vocab_path},
    model::{TokenizerConfig, TokenizerModel},
};

/// The paths written by [`save_tokenizer_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerFilePaths {
    /// The binary vocabulary, ``{name}.tokenizer.bin``.
    pub model_file: PathBuf,

    /// The ini side-car, ``{name}.tokenizer.ini``.
    pub config_file: PathBuf,
}

impl TokenizerFilePaths {
    /// The paths for `name` in `dir`.
    pub fn new(
        dir: impl AsRef<Path>,
        name: &str,
    ) -> Self {
        let dir = dir.as_ref();
        Self {
            model_file: dir.join(format!("{name}.tokenizer.bin")),
            config_file: dir.join(format!("{name}.tokenizer.ini")),
        }
    }
}

/// Save a model as a binary vocabulary and ini side-car.
///
/// The ini ``model_file`` names the binary vocabulary relative to the ini file.
/// Both files are fully rendered before either is created; if the ini can't be
/// written, the binary vocabulary is removed again.
pub fn save_tokenizer_files(
    model: &TokenizerModel,
    dir: impl AsRef<Path>,
    name: &str,
) -> LLResult<TokenizerFilePaths> {
    let paths = TokenizerFilePaths::new(dir, name);

    let vocab = encode_vocab(model)?;
    let ini = model.config().to_ini(&format!("{name}.tokenizer.bin"));

    log::info!("save model: {}", paths.model_file.display());
    fs::write(&paths.model_file, vocab)?;

    log::info!("save config: {}", paths.config_file.display());
    if let Err(err) = fs::write(&paths.config_file, ini) {
        if let Err(cleanup) = fs::remove_file(&paths.model_file) {
            log::warn!("failed to remove {}: {cleanup}", paths.model_file.display());
        }
        return Err(err.into());
    }

    Ok(paths)
}

/// Load a model from an ini side-car and the binary vocabulary it names.
pub fn load_tokenizer_files(config_file: impl AsRef<Path>) -> LLResult<TokenizerModel> {
    let config_file = config_file.as_ref();
    let (config, model_file): (TokenizerConfig, String) =
        TokenizerConfig::from_ini(&fs::read_to_string(config_file)?)?;

    let model_path = match config_file.parent() {
        Some(dir) => dir.join(&model_file),
        None => PathBuf::from(&model_file),
    };
    TokenizerModel::from_tokens(config, load_vocab_path(model_path)?)
}
