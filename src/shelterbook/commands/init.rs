use crate::commands::{CmdMessage, CmdResult, DataPaths};
use crate::error::Result;
use crate::store::DataStore;

/// Create the data directory and every collection file that is missing.
/// Existing files are left alone, so running it twice is harmless.
pub fn run<S: DataStore>(store: &mut S, paths: &DataPaths) -> Result<CmdResult> {
    let created = store.initialize()?;
    tracing::info!(dir = %paths.data_dir.display(), created = created.len(), "data directory initialized");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Initialized shelterbook data at {}",
        paths.data_dir.display()
    )));
    for kind in created {
        result.add_message(CmdMessage::info(format!("  created {}", kind.file_name())));
    }
    if result.messages.len() == 1 {
        result.add_message(CmdMessage::info("  all collections already present"));
    }

    result.add_message(CmdMessage::info(String::new()));
    result.add_message(CmdMessage::info(
        "Next: `shelterbook register` to create the first (admin) account.",
    ));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;
    use crate::store::fs::FileStore;
    use tempfile::tempdir;

    #[test]
    fn creates_collection_files_once() {
        let temp = tempdir().unwrap();
        let data_dir = temp.path().join("Data");
        let paths = DataPaths::new(data_dir.clone());
        let mut store = FileStore::new(data_dir.clone());

        let result = run(&mut store, &paths).unwrap();
        assert!(result.messages[1].content.contains("users.json"));
        for kind in EntityKind::ALL {
            let text = std::fs::read_to_string(data_dir.join(kind.file_name())).unwrap();
            assert_eq!(text, "[]");
        }

        let again = run(&mut store, &paths).unwrap();
        assert_eq!(again.messages[1].content, "  all collections already present");
    }
}
