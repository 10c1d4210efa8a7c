//! # Tokenizer Side-car Config

use crate::errors::{LLResult, LLVocabError};

/// The ini section holding the tokenizer settings.
pub const INI_SECTION: &str = "tokenizer";

/// The tokenizer type recorded in the ini file.
pub const INI_TOKENIZER_TYPE: &str = "bpe";

/// Runtime tokenizer settings, exported alongside the binary vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Prepend a space to input text before encoding.
    pub add_prefix_space: bool,

    /// Split on unicode character boundaries before byte-pair merging.
    pub split_by_unicode: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            add_prefix_space: true,
            split_by_unicode: true,
        }
    }
}

impl TokenizerConfig {
    /// Set `add_prefix_space`.
    pub fn with_add_prefix_space(
        self,
        add_prefix_space: bool,
    ) -> Self {
        Self {
            add_prefix_space,
            ..self
        }
    }

    /// Set `split_by_unicode`.
    pub fn with_split_by_unicode(
        self,
        split_by_unicode: bool,
    ) -> Self {
        Self {
            split_by_unicode,
            ..self
        }
    }

    /// Render the ``[tokenizer]`` ini section.
    ///
    /// ## Arguments
    /// * `model_file` - path of the binary vocabulary, as the runtime should see it.
    pub fn to_ini(
        &self,
        model_file: &str,
    ) -> String {
        format!(
            "[{INI_SECTION}]\n\
             type = {INI_TOKENIZER_TYPE}\n\
             model_file = {model_file}\n\
             add_prefix_space = {}\n\
             split_by_unicode = {}\n\n",
            self.add_prefix_space, self.split_by_unicode,
        )
    }

    /// Parse the ``[tokenizer]`` ini section.
    ///
    /// ## Returns
    /// The config, and the `model_file` it names.
    pub fn from_ini(text: &str) -> LLResult<(Self, String)> {
        let mut config = Self::default();
        let mut model_file = None;
        let mut in_section = false;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_section = name.trim() == INI_SECTION;
                continue;
            }
            if !in_section {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| LLVocabError::Parse(format!("malformed ini line: {line:?}")))?;
            let value = value.trim();
            match key.trim() {
                "type" if value != INI_TOKENIZER_TYPE => {
                    return Err(LLVocabError::Parse(format!(
                        "unsupported tokenizer type: {value:?}"
                    )));
                }
                "model_file" => model_file = Some(value.to_string()),
                "add_prefix_space" => config.add_prefix_space = parse_ini_bool(value)?,
                "split_by_unicode" => config.split_by_unicode = parse_ini_bool(value)?,
                _ => {}
            }
        }

        let model_file = model_file
            .ok_or_else(|| LLVocabError::Parse("ini has no tokenizer model_file".to_string()))?;
        Ok((config, model_file))
    }
}

fn parse_ini_bool(value: &str) -> LLResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(LLVocabError::Parse(format!("invalid ini bool: {value:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ini() {
        let config = TokenizerConfig::default().with_add_prefix_space(false);
        assert_eq!(
            config.to_ini("llama.tokenizer.bin"),
            "[tokenizer]\n\
             type = bpe\n\
             model_file = llama.tokenizer.bin\n\
             add_prefix_space = false\n\
             split_by_unicode = true\n\n"
        );
    }

    #[test]
    fn test_from_ini() {
        let config = TokenizerConfig::default().with_split_by_unicode(false);
        let text = config.to_ini("a/b.bin");

        let (parsed, model_file) = TokenizerConfig::from_ini(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(model_file, "a/b.bin");

        let (parsed, _) = TokenizerConfig::from_ini(
            "[other]\nadd_prefix_space=true\n\n[tokenizer]\nmodel_file=x\nadd_prefix_space=false\n",
        )
        .unwrap();
        assert!(!parsed.add_prefix_space);
        assert!(parsed.split_by_unicode);
    }

    #[test]
    fn test_from_ini_errors() {
        assert!(TokenizerConfig::from_ini("[tokenizer]\ntype = wordpiece\nmodel_file = x\n").is_err());
        assert!(TokenizerConfig::from_ini("[tokenizer]\nadd_prefix_space = yes\n").is_err());
        assert!(TokenizerConfig::from_ini("[tokenizer]\ntype = bpe\n").is_err());
    }
}
