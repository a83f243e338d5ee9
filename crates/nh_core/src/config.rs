use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The supported source variants. Adding a source means adding a variant
/// here and a collector for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    G1Tecnologia,
    FolhaTec,
    UolTilt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub name: String,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub sources: Vec<SourceConfig>,
    pub max_articles_per_source: usize,
    pub min_title_length: usize,
    pub remove_duplicates: bool,
    pub keywords: Vec<String>,
    pub inter_source_delay_ms: u64,
}

impl CollectionConfig {
    pub fn inter_source_delay(&self) -> Duration {
        Duration::from_millis(self.inter_source_delay_ms)
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            max_articles_per_source: 20,
            min_title_length: 10,
            remove_duplicates: true,
            keywords: default_keywords(),
            inter_source_delay_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub collection_interval_hours: u64,
    /// Wall-clock time of day for the daily summary, "HH:MM".
    pub daily_summary_time: String,
    /// Tick granularity of the polling loop.
    pub poll_interval_ms: u64,
}

impl ScheduleConfig {
    pub fn summary_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.daily_summary_time, "%H:%M").map_err(|e| {
            Error::Config(format!(
                "invalid daily_summary_time {:?}: {}",
                self.daily_summary_time, e
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            collection_interval_hours: 24,
            daily_summary_time: "13:00".to_string(),
            poll_interval_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub email_subject_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            email_subject_prefix: "[News Auto] Resumo Diário de Tecnologia".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub collection: CollectionConfig,
    pub schedule: ScheduleConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            url: "https://g1.globo.com/tecnologia/".to_string(),
            name: "G1 Tecnologia".to_string(),
            kind: SourceKind::G1Tecnologia,
        },
        SourceConfig {
            url: "https://www1.folha.uol.com.br/tec/".to_string(),
            name: "Folha de S.Paulo - Tec".to_string(),
            kind: SourceKind::FolhaTec,
        },
        SourceConfig {
            url: "https://www.uol.com.br/tilt/".to_string(),
            name: "UOL Tilt".to_string(),
            kind: SourceKind::UolTilt,
        },
    ]
}

fn default_keywords() -> Vec<String> {
    [
        "tecnologia",
        "inovação",
        "startup",
        "IA",
        "inteligência artificial",
        "machine learning",
        "blockchain",
        "fintech",
        "edtech",
        "healthtech",
        "sustentabilidade",
        "energia renovável",
        "carro elétrico",
        "5G",
        "metaverso",
        "NFT",
        "cryptocurrency",
        "robótica",
        "automação",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
