use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

/// Queue key: newest committer time first; ties go to whichever commit was
/// discovered first.
type QueueKey = (i64, Reverse<usize>);

/// Ancestry of one or more start commits, newest first, each commit once.
#[derive(Debug)]
pub struct RevList<'d> {
    database: &'d Database,
    queue: BinaryHeap<(QueueKey, ObjectId)>,
    seen: HashSet<ObjectId>,
    discovered: usize,
    pending_error: Option<crate::errors::GelError>,
}

impl<'d> RevList<'d> {
    pub fn new(database: &'d Database, starts: impl IntoIterator<Item = ObjectId>) -> Self {
        let mut rev_list = RevList {
            database,
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            discovered: 0,
            pending_error: None,
        };
        for oid in starts {
            if let Err(e) = rev_list.enqueue(oid) {
                rev_list.pending_error = Some(e);
                break;
            }
        }

        rev_list
    }

    fn enqueue(&mut self, oid: ObjectId) -> Result<()> {
        if !self.seen.insert(oid) {
            return Ok(());
        }

        let commit = self.database.load_commit(&oid)?;
        let key = (commit.committer().timestamp().timestamp(), Reverse(self.discovered));
        self.discovered += 1;
        self.queue.push((key, oid));

        Ok(())
    }

    fn advance(&mut self) -> Result<Option<(ObjectId, Commit)>> {
        let Some((_, oid)) = self.queue.pop() else {
            return Ok(None);
        };

        let commit = self.database.load_commit(&oid)?;
        for parent in commit.parents() {
            self.enqueue(*parent)?;
        }

        Ok(Some((oid, commit)))
    }
}

impl Iterator for RevList<'_> {
    type Item = Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending_error.take() {
            self.queue.clear();
            return Some(Err(error));
        }

        match self.advance() {
            Ok(next) => next.map(Ok),
            Err(error) => {
                self.queue.clear();
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Identity;
    use assert_fs::TempDir;
    use chrono::{DateTime, FixedOffset};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct History {
        _dir: TempDir,
        database: Database,
    }

    impl History {
        fn commit(&self, message: &str, parents: &[ObjectId], seconds: i64) -> ObjectId {
            let timestamp: DateTime<FixedOffset> = DateTime::from_timestamp(seconds, 0)
                .unwrap()
                .fixed_offset();
            let author = Identity::new_with_timestamp("A U Thor".into(), "author@example.com".into(), timestamp);
            let tree = ObjectId::hash(b"tree");
            let commit = Commit::new(parents.to_vec(), tree, author, message.to_string());

            self.database.store(&commit).unwrap()
        }

        fn messages(&self, starts: &[ObjectId]) -> Vec<String> {
            RevList::new(&self.database, starts.iter().copied())
                .map(|entry| entry.unwrap().1.title_line().to_string())
                .collect()
        }
    }

    #[fixture]
    fn history() -> History {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path());
        History { _dir: dir, database }
    }

    #[rstest]
    fn walks_linear_history_newest_first(history: History) {
        let first = history.commit("first", &[], 100);
        let second = history.commit("second", &[first], 200);
        let third = history.commit("third", &[second], 300);

        assert_eq!(history.messages(&[third]), vec!["third", "second", "first"]);
    }

    #[rstest]
    fn visits_a_shared_ancestor_once(history: History) {
        let base = history.commit("base", &[], 100);
        let left = history.commit("left", &[base], 200);
        let right = history.commit("right", &[base], 300);
        let merge = history.commit("merge", &[left, right], 400);

        assert_eq!(history.messages(&[merge]), vec!["merge", "right", "left", "base"]);
    }

    #[rstest]
    fn equal_timestamps_keep_discovery_order(history: History) {
        let base = history.commit("base", &[], 100);
        let a = history.commit("a", &[base], 100);
        let b = history.commit("b", &[base], 100);

        assert_eq!(history.messages(&[a, b]), vec!["a", "b", "base"]);
    }

    #[rstest]
    fn missing_commit_surfaces_as_an_error(history: History) {
        let missing = ObjectId::hash(b"nothing here");

        let mut rev_list = RevList::new(&history.database, [missing]);

        assert!(rev_list.next().unwrap().unwrap_err().is_not_found());
        assert!(rev_list.next().is_none());
    }
}
