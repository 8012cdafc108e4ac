use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::error::Error;

static POOL_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/pools");

/// A named pairing of sentence pool and countdown length
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Sprint,
    Standard,
    #[default]
    Classic,
}

impl Preset {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SentencePool {
    name: String,
    duration_secs: u32,
    sentences: Vec<String>,
}

impl SentencePool {
    pub fn for_preset(preset: Preset) -> Result<Self, Box<dyn Error>> {
        read_pool_from_file(&preset.file_name())
    }

    /// A pool holding only the given sentence
    pub fn custom(sentence: String, duration_secs: u32) -> Result<Self, Box<dyn Error>> {
        Self::validated(SentencePool {
            name: "custom".to_string(),
            duration_secs,
            sentences: vec![sentence],
        })
    }

    fn validated(pool: SentencePool) -> Result<Self, Box<dyn Error>> {
        if pool.sentences.is_empty() {
            return Err(format!("sentence pool '{}' is empty", pool.name).into());
        }
        if pool.sentences.iter().any(|s| s.is_empty()) {
            return Err(format!("sentence pool '{}' contains an empty sentence", pool.name).into());
        }
        if pool.duration_secs == 0 {
            return Err(format!("sentence pool '{}' has a zero duration", pool.name).into());
        }
        Ok(pool)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn select_sentence(&self) -> String {
        self.select_sentence_with(&mut rand::thread_rng())
    }

    /// Uniform pick; pools are never empty once constructed.
    pub fn select_sentence_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.sentences[rng.gen_range(0..self.sentences.len())].clone()
    }
}

fn read_pool_from_file(file_name: &str) -> Result<SentencePool, Box<dyn Error>> {
    let file = POOL_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("sentence pool {file_name} not found"))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| format!("sentence pool {file_name} is not valid utf-8"))?;

    SentencePool::validated(from_str(contents)?)
}
