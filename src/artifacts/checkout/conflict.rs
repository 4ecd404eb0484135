use crate::artifacts::database::database_entry::DatabaseEntry;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct ConflictMessage {
    pub header: &'static str,
    pub footer: &'static str,
}

impl From<ConflictType> for ConflictMessage {
    fn from(value: ConflictType) -> Self {
        match value {
            ConflictType::StaleFile => Self {
                header: "Your local changes to the following files would be overwritten by switch:",
                footer: "Please commit your changes before you switch branches.",
            },
            ConflictType::StaleDirectory => Self {
                header: "Updating the following directories would lose untracked files in them:",
                footer: "Please move or remove them before you switch branches.",
            },
            ConflictType::UntrackedOverwritten => Self {
                header: "The following untracked working tree files would be overwritten by switch:",
                footer: "Please move or remove them before you switch branches.",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConflictType {
    /// Tracked file with staged or unstaged changes
    StaleFile,
    /// Directory in the way that holds untracked files
    StaleDirectory,
    /// Untracked file where the target branch has one
    UntrackedOverwritten,
}

impl ConflictType {
    /// Kind of conflict for a path whose local state disagrees with the
    /// switch. `tracked` says whether the index knows the path.
    pub fn classify(tracked: bool, is_dir: bool, new_entry: Option<&DatabaseEntry>) -> Option<Self> {
        match (tracked, is_dir, new_entry) {
            (true, _, _) => Some(ConflictType::StaleFile),
            (false, true, _) => Some(ConflictType::StaleDirectory),
            (false, false, Some(_)) => Some(ConflictType::UntrackedOverwritten),
            (false, false, None) => None,
        }
    }
}

pub type ConflictsSet = BTreeMap<ConflictType, Vec<String>>;

/// One block per conflict kind: header, the tab-indented paths, footer.
pub fn render_conflicts(conflicts: &ConflictsSet) -> String {
    conflicts
        .iter()
        .filter(|(_, paths)| !paths.is_empty())
        .map(|(conflict_type, paths)| {
            let ConflictMessage { header, footer } = (*conflict_type).into();
            let paths: Vec<String> = paths.iter().map(|path| format!("\t{path}")).collect();
            format!("{header}\n{}\n{footer}", paths.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::file_mode::FileMode;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(true, false, true, Some(ConflictType::StaleFile))]
    #[case(false, true, true, Some(ConflictType::StaleDirectory))]
    #[case(false, false, true, Some(ConflictType::UntrackedOverwritten))]
    #[case(false, false, false, None)]
    fn classifies_local_state(
        #[case] tracked: bool,
        #[case] is_dir: bool,
        #[case] has_new: bool,
        #[case] expected: Option<ConflictType>,
    ) {
        let entry = DatabaseEntry::new(ObjectId::hash(b"x"), FileMode::Regular);
        let new_entry = has_new.then_some(&entry);

        assert_eq!(ConflictType::classify(tracked, is_dir, new_entry), expected);
    }

    #[test]
    fn renders_one_block_per_kind() {
        let conflicts = ConflictsSet::from([
            (ConflictType::StaleFile, vec!["a.txt".to_string(), "b.txt".to_string()]),
            (ConflictType::StaleDirectory, Vec::new()),
        ]);

        assert_eq!(
            render_conflicts(&conflicts),
            "Your local changes to the following files would be overwritten by switch:\n\
             \ta.txt\n\tb.txt\n\
             Please commit your changes before you switch branches."
        );
    }
}
