//! Planning poker rounds, their stored results and keyword search over them.

use std::path::{Path, PathBuf};

use crate::domain::{BacklogItem, ENCRYPTED_SUFFIX, EstimateSummary, PokerRound};
use crate::error::Result;
use crate::infrastructure::record_codec::encode_summary;
use crate::infrastructure::{EncryptedFileStore, EntityKind};

/// A stored result whose content matched a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// File name without the encrypted suffix, e.g. `Login_page`.
    pub name: String,
    pub path: PathBuf,
}

impl SearchHit {
    fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(ENCRYPTED_SUFFIX)
            .map(str::to_string)
            .unwrap_or(file_name);
        SearchHit { name, path }
    }
}

pub struct PlanningPokerUseCase {
    store: EncryptedFileStore,
    logger: logging::Logger,
}

impl PlanningPokerUseCase {
    pub fn new(store: EncryptedFileStore, logger: logging::Logger) -> Self {
        PlanningPokerUseCase { store, logger }
    }

    pub fn new_round(&self, item: BacklogItem, participants: u32) -> Result<PokerRound> {
        let round = PokerRound::new(item, participants)?;
        self.logger.info(&format!(
            "Planning poker round for '{}' with {} participant(s)",
            round.item().name,
            participants
        ));
        Ok(round)
    }

    /// Appends the summary block to the item's file and returns its path.
    /// Repeated estimates of the same item accumulate in one file.
    pub fn append_planning_poker_result(&self, summary: &EstimateSummary) -> Result<PathBuf> {
        summary.item.validate()?;
        let path = self
            .store
            .path_for(EntityKind::PlanningPoker, &summary.item.name)?;
        self.store.append(&path, &encode_summary(summary))?;

        self.logger.info(&format!(
            "Stored estimate {:.2} for '{}' in {}",
            summary.average,
            summary.item.name,
            path.display()
        ));
        Ok(path)
    }

    pub fn search_by_keyword(&self, term: &str) -> Result<Vec<SearchHit>> {
        let hits: Vec<SearchHit> = self
            .store
            .search(EntityKind::PlanningPoker, term)?
            .into_iter()
            .map(SearchHit::from_path)
            .collect();
        self.logger
            .info(&format!("Search for '{}' found {} result(s)", term, hits.len()));
        Ok(hits)
    }

    /// Decrypted content of one stored result.
    pub fn read_result(&self, path: &Path) -> Result<String> {
        self.store.read_all_decrypted(path)
    }
}
