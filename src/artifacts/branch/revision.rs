use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{GelError, Result};

/// Shortest hex prefix accepted as an abbreviated object id
const MIN_PREFIX_LENGTH: usize = 4;

/// Suffix patterns, compiled once for a whole expression
struct RevisionPatterns {
    parent: regex::Regex,
    ancestor: regex::Regex,
}

/// A revision expression naming one object.
///
/// - Names: `master`, `feature/login`, `HEAD`, `refs/heads/master`, `@`
/// - Object ids, full or abbreviated to at least 4 hex digits
/// - `<rev>^`: first parent
/// - `<rev>~<n>`: n-th first-parent ancestor
///
/// Hex-looking names are tried as refs first and only then as object ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Ref(BranchName),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> Result<Revision> {
        let invalid = |e: regex::Error| GelError::InvalidRevision(e.to_string());
        let patterns = RevisionPatterns {
            parent: regex::Regex::new(PARENT_REGEX).map_err(invalid)?,
            ancestor: regex::Regex::new(ANCESTOR_REGEX).map_err(invalid)?,
        };

        Self::parse_with(revision, &patterns)
    }

    fn parse_with(revision: &str, patterns: &RevisionPatterns) -> Result<Revision> {
        if let Some(caps) = patterns.parent.captures(revision) {
            return Ok(Revision::Parent(Box::new(Self::parse_with(&caps[1], patterns)?)));
        }

        if let Some(caps) = patterns.ancestor.captures(revision) {
            let generations = caps[2]
                .parse()
                .map_err(|_| GelError::InvalidRevision(revision.to_string()))?;
            return Ok(Revision::Ancestor(
                Box::new(Self::parse_with(&caps[1], patterns)?),
                generations,
            ));
        }

        let name = REF_ALIASES.get(revision).copied().unwrap_or(revision);
        BranchName::try_parse(name)
            .map(Revision::Ref)
            .map_err(|_| GelError::InvalidRevision(revision.to_string()))
    }

    pub fn resolve(&self, repository: &Repository) -> Result<ObjectId> {
        match self {
            Revision::Ref(name) => match repository.refs().resolve(name.as_ref()) {
                Ok(oid) => Ok(oid),
                Err(e) if e.is_not_found() && Self::looks_like_oid(name.as_ref()) => {
                    Self::resolve_prefix(name.as_ref(), repository)
                }
                Err(e) => Err(e),
            },
            Revision::Parent(base) => {
                let oid = base.resolve(repository)?;
                Self::first_parent(&oid, repository)?
                    .ok_or_else(|| GelError::InvalidRevision(format!("{self}: {oid} has no parent")))
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::first_parent(&oid, repository)?.ok_or_else(|| {
                        GelError::InvalidRevision(format!("{self}: history is too short"))
                    })?;
                }

                Ok(oid)
            }
        }
    }

    fn first_parent(oid: &ObjectId, repository: &Repository) -> Result<Option<ObjectId>> {
        Ok(repository.database().load_commit(oid)?.parent().copied())
    }

    fn resolve_prefix(prefix: &str, repository: &Repository) -> Result<ObjectId> {
        let database = repository.database();
        let matches = database.find_objects_by_prefix(prefix)?;

        match matches.as_slice() {
            [] => Err(GelError::ObjectNotFound(prefix.to_string())),
            [oid] => Ok(*oid),
            _ => {
                // several candidates: a single commit among them wins
                let commits: Vec<&ObjectId> = matches
                    .iter()
                    .filter(|oid| database.object_type(oid).ok() == Some(ObjectType::Commit))
                    .collect();
                match commits.as_slice() {
                    [oid] => Ok(**oid),
                    _ => Err(GelError::AmbiguousObjectId {
                        prefix: prefix.to_string(),
                        candidates: matches.iter().map(ObjectId::to_short_oid).collect(),
                    }),
                }
            }
        }
    }

    fn looks_like_oid(name: &str) -> bool {
        (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&name.len())
            && name.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Ref(name) => write!(f, "{name}"),
            Revision::Parent(base) => write!(f, "{base}^"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn name(name: &str) -> Revision {
        Revision::Ref(BranchName::try_parse(name).unwrap())
    }

    #[rstest]
    #[case("master", name("master"))]
    #[case("@", name("HEAD"))]
    #[case("feature/login", name("feature/login"))]
    #[case("master^", Revision::Parent(Box::new(name("master"))))]
    #[case("HEAD~3", Revision::Ancestor(Box::new(name("HEAD")), 3))]
    #[case(
        "@^^",
        Revision::Parent(Box::new(Revision::Parent(Box::new(name("HEAD")))))
    )]
    #[case("a1b2c3d~0", Revision::Ancestor(Box::new(name("a1b2c3d")), 0))]
    #[case(
        "master~2^~1",
        Revision::Ancestor(
            Box::new(Revision::Parent(Box::new(Revision::Ancestor(Box::new(name("master")), 2)))),
            1
        )
    )]
    fn parses_revision_expressions(#[case] input: &str, #[case] expected: Revision) {
        assert_eq!(Revision::try_parse(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("bad name")]
    #[case("two..dots")]
    #[case("x.lock")]
    #[case(".bad^")]
    fn rejects_invalid_names(#[case] input: &str) {
        assert!(matches!(
            Revision::try_parse(input),
            Err(GelError::InvalidRevision(_))
        ));
    }

    #[rstest]
    #[case("abcd", true)]
    #[case("abc", false)]
    #[case("master", false)]
    #[case("0123456789abcdef", true)]
    fn recognizes_object_id_prefixes(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(Revision::looks_like_oid(input), expected);
    }

    proptest! {
        #[test]
        fn display_inverts_parsing(
            base in "[a-z][a-z0-9]{0,8}",
            suffixes in proptest::collection::vec(prop_oneof![Just("^".to_string()), (0usize..20).prop_map(|n| format!("~{n}"))], 0..4),
        ) {
            let text = format!("{base}{}", suffixes.concat());

            let revision = Revision::try_parse(&text).unwrap();

            prop_assert_eq!(revision.to_string(), text);
        }
    }
}
