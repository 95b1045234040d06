//! Registry of documented Coq objects
//!
//!     Documented objects (commands, tactics, options, errors, ...) are grouped into
//!     subdomains: namespaces in which names must be unique. A tactic and a theorem
//!     may share a name; two tactics may not. Several object types can live in the same
//!     subdomain (a command and its variants both answer `:cmd:` references).
//!
//!     The [ObjectStore] maps `subdomain → name → (docname, object type, target id)`.
//!     Documentation builds are incremental and may run in parallel, so the store
//!     supports dropping everything recorded by one document ([ObjectStore::clear_doc])
//!     and folding in what another worker recorded ([ObjectStore::merge]).

use coqrst_notation::{parse_notation, NotationError};
use coqrst_render::formats::ellipsis::{stringify_with_ellipses, EllipsisOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

static LEADING_NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-0-9]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subdomain {
    Cmd,
    Tac,
    Tacn,
    Opt,
    Thm,
    Exn,
}

impl Subdomain {
    pub const ALL: [Subdomain; 6] = [
        Subdomain::Cmd,
        Subdomain::Tac,
        Subdomain::Tacn,
        Subdomain::Opt,
        Subdomain::Thm,
        Subdomain::Exn,
    ];

    /// The cross-reference role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subdomain::Cmd => "cmd",
            Subdomain::Tac => "tac",
            Subdomain::Tacn => "tacn",
            Subdomain::Opt => "opt",
            Subdomain::Thm => "thm",
            Subdomain::Exn => "exn",
        }
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subdomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subdomain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown Coq subdomain: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Cmd,
    Cmdv,
    Tac,
    Tacn,
    Tacv,
    Opt,
    Thm,
    Exn,
}

impl ObjectType {
    pub const ALL: [ObjectType; 8] = [
        ObjectType::Cmd,
        ObjectType::Cmdv,
        ObjectType::Tac,
        ObjectType::Tacn,
        ObjectType::Tacv,
        ObjectType::Opt,
        ObjectType::Thm,
        ObjectType::Exn,
    ];

    /// The directive name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Cmd => "cmd",
            ObjectType::Cmdv => "cmdv",
            ObjectType::Tac => "tac",
            ObjectType::Tacn => "tacn",
            ObjectType::Tacv => "tacv",
            ObjectType::Opt => "opt",
            ObjectType::Thm => "thm",
            ObjectType::Exn => "exn",
        }
    }

    pub fn subdomain(&self) -> Subdomain {
        match self {
            ObjectType::Cmd | ObjectType::Cmdv => Subdomain::Cmd,
            ObjectType::Tac => Subdomain::Tac,
            ObjectType::Tacn | ObjectType::Tacv => Subdomain::Tacn,
            ObjectType::Opt => Subdomain::Opt,
            ObjectType::Thm => Subdomain::Thm,
            ObjectType::Exn => Subdomain::Exn,
        }
    }

    /// Suffix for entries in the general index.
    pub fn index_suffix(&self) -> &'static str {
        match self {
            ObjectType::Cmd => "(command)",
            ObjectType::Cmdv => "(command variant)",
            ObjectType::Tac => "(tactic)",
            ObjectType::Tacn => "(tactic notation)",
            ObjectType::Tacv => "(tactic variant)",
            ObjectType::Opt => "(option)",
            ObjectType::Thm => "(theorem)",
            ObjectType::Exn => "(error)",
        }
    }

    /// Label shown before the object's signature, if any.
    pub fn annotation(&self) -> Option<&'static str> {
        match self {
            ObjectType::Cmd => Some("Command"),
            ObjectType::Cmdv | ObjectType::Tacv => Some("Variant"),
            ObjectType::Tac | ObjectType::Tacn => None,
            ObjectType::Opt => Some("Option"),
            ObjectType::Thm => Some("Theorem"),
            ObjectType::Exn => Some("Error"),
        }
    }

    /// Whether signatures of this type are notations (rendered as boxes) rather than
    /// literal text.
    pub fn is_notation(&self) -> bool {
        !matches!(self, ObjectType::Tac | ObjectType::Thm)
    }

    /// The name an object gets from its signature alone.
    ///
    /// Commands, their variants, options and errors are named after the ellipsis
    /// rendering of their signature; other types need an explicit name.
    pub fn name_from_signature(&self, signature: &str) -> Result<Option<String>, NotationError> {
        match self {
            ObjectType::Cmd | ObjectType::Cmdv | ObjectType::Opt | ObjectType::Exn => {
                let notation = parse_notation(signature)?;
                Ok(Some(stringify_with_ellipses(
                    &notation,
                    &EllipsisOptions::default(),
                )))
            }
            _ => Ok(None),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown Coq object type: {}", s))
    }
}

/// Turn a name into an identifier usable in URLs: lowercase ASCII letters and digits
/// separated by single dashes, never starting with a digit or dash.
///
/// Accented letters are transliterated first (`é` → `e`).
pub fn make_id(name: &str) -> String {
    let slug = slug::slugify(name);
    LEADING_NON_LETTERS.replace(&slug, "").into_owned()
}

/// Link target for an object of type `objtype` with identifier `id`.
pub fn make_target(objtype: ObjectType, id: &str) -> String {
    format!("coq:{}.{}", objtype, id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub docname: String,
    pub objtype: ObjectType,
    pub target: String,
}

/// A name recorded twice in the same subdomain. The later record wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateObject {
    pub subdomain: Subdomain,
    pub name: String,
    pub previous_docname: String,
    pub docname: String,
}

impl fmt::Display for DuplicateObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicate Coq object: {}; other is in {}",
            self.name, self.previous_docname
        )
    }
}

/// One object, as listed for search and inventories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRecord {
    pub name: String,
    pub objtype: ObjectType,
    pub docname: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStore {
    objects: BTreeMap<Subdomain, BTreeMap<String, ObjectEntry>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        ObjectStore {
            objects: Subdomain::ALL
                .into_iter()
                .map(|subdomain| (subdomain, BTreeMap::new()))
                .collect(),
        }
    }

    fn subdomain_mut(&mut self, subdomain: Subdomain) -> &mut BTreeMap<String, ObjectEntry> {
        self.objects.entry(subdomain).or_default()
    }

    /// Record `name` in its type's subdomain.
    ///
    /// An existing entry of the same name is replaced; the clash is logged and returned.
    pub fn record(
        &mut self,
        name: &str,
        docname: &str,
        objtype: ObjectType,
        target: &str,
    ) -> Option<DuplicateObject> {
        let subdomain = objtype.subdomain();
        let entry = ObjectEntry {
            docname: docname.to_string(),
            objtype,
            target: target.to_string(),
        };
        let previous = self.subdomain_mut(subdomain).insert(name.to_string(), entry)?;

        let duplicate = DuplicateObject {
            subdomain,
            name: name.to_string(),
            previous_docname: previous.docname,
            docname: docname.to_string(),
        };
        tracing::warn!(%subdomain, docname, "{}", duplicate);
        Some(duplicate)
    }

    /// Record `name` under the target derived from it, returning that target.
    pub fn register(
        &mut self,
        name: &str,
        docname: &str,
        objtype: ObjectType,
    ) -> (String, Option<DuplicateObject>) {
        let target = make_target(objtype, &make_id(name));
        let duplicate = self.record(name, docname, objtype, &target);
        (target, duplicate)
    }

    pub fn resolve(&self, subdomain: Subdomain, name: &str) -> Option<&ObjectEntry> {
        self.objects.get(&subdomain)?.get(name)
    }

    /// Forget every object recorded by `docname`.
    pub fn clear_doc(&mut self, docname: &str) {
        for objects in self.objects.values_mut() {
            objects.retain(|_, entry| entry.docname != docname);
        }
    }

    /// Fold in the objects `other` recorded for `docnames`.
    ///
    /// Objects from other documents are ignored. Clashes are logged and returned, and
    /// `other`'s entry wins.
    pub fn merge<S: AsRef<str>>(
        &mut self,
        docnames: &[S],
        other: &ObjectStore,
    ) -> Vec<DuplicateObject> {
        let mut duplicates = Vec::new();
        for (name, entry) in other.entries() {
            if docnames.iter().any(|d| d.as_ref() == entry.docname) {
                if let Some(duplicate) =
                    self.record(name, &entry.docname, entry.objtype, &entry.target)
                {
                    duplicates.push(duplicate);
                }
            }
        }
        duplicates
    }

    fn entries(&self) -> impl Iterator<Item = (&String, &ObjectEntry)> {
        self.objects.values().flat_map(|objects| objects.iter())
    }

    /// Every recorded object, by subdomain then name.
    pub fn objects(&self) -> Vec<ObjectRecord> {
        self.entries()
            .map(|(name, entry)| ObjectRecord {
                name: name.clone(),
                objtype: entry.objtype,
                docname: entry.docname.clone(),
                target: entry.target.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}
