// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Set algebra that turns fetched contributors and authors into the roster.
//!
//! GitHub logins are case-insensitive, so every set in this module is keyed
//! by the lowercase form of a handle. The roster therefore never holds two
//! spellings of the same account, and its order is the lowercase order.

use std::collections::{BTreeMap, btree_map::Entry};

/// Set of handles compared case-insensitively.
///
/// When several spellings of the same handle are inserted, the
/// lexicographically smallest one is kept so the result does not depend on
/// insertion order.
///
/// # Examples
///
/// ```
/// use collage::HandleSet;
///
/// let set: HandleSet = ["Octocat", "octocat", "hubot",].into_iter().collect();
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("OCTOCAT"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct HandleSet
{
    entries: BTreeMap<String, String,>,
}

impl HandleSet
{
    /// Creates an empty set.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Inserts `handle`, returning `true` when no spelling of it was present.
    pub fn insert<H,>(&mut self, handle: H,) -> bool
    where
        H: Into<String,>,
    {
        let handle = handle.into();
        match self.entries.entry(fold(&handle,),) {
            Entry::Vacant(slot,) => {
                slot.insert(handle,);
                true
            }
            Entry::Occupied(mut slot,) => {
                if handle < *slot.get() {
                    slot.insert(handle,);
                }
                false
            }
        }
    }

    /// Returns `true` when any spelling of `handle` is present.
    pub fn contains(&self, handle: &str,) -> bool
    {
        self.entries.contains_key(&fold(handle,),)
    }

    /// Number of distinct handles.
    pub fn len(&self,) -> usize
    {
        self.entries.len()
    }

    /// Returns `true` when the set holds no handles.
    pub fn is_empty(&self,) -> bool
    {
        self.entries.is_empty()
    }

    /// Iterates over the stored spellings in case-insensitive order.
    pub fn iter(&self,) -> impl Iterator<Item = &str,> + '_
    {
        self.entries.values().map(String::as_str,)
    }
}

impl<H,> FromIterator<H,> for HandleSet
where
    H: Into<String,>,
{
    fn from_iter<I: IntoIterator<Item = H,>,>(iter: I,) -> Self
    {
        let mut set = Self::new();
        set.extend(iter,);
        set
    }
}

impl<H,> Extend<H,> for HandleSet
where
    H: Into<String,>,
{
    fn extend<I: IntoIterator<Item = H,>,>(&mut self, iter: I,)
    {
        for handle in iter {
            self.insert(handle,);
        }
    }
}

/// Final ordered list of handles rendered into the collage.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct Roster
{
    handles: Vec<String,>,
}

impl Roster
{
    /// Handles in render order.
    pub fn handles(&self,) -> &[String]
    {
        &self.handles
    }

    /// Number of handles in the roster.
    pub fn len(&self,) -> usize
    {
        self.handles.len()
    }

    /// Returns `true` when nothing will be rendered.
    pub fn is_empty(&self,) -> bool
    {
        self.handles.is_empty()
    }

    /// Iterates over the handles in render order.
    pub fn iter(&self,) -> std::slice::Iter<'_, String,>
    {
        self.handles.iter()
    }
}

impl<'a,> IntoIterator for &'a Roster
{
    type IntoIter = std::slice::Iter<'a, String,>;
    type Item = &'a String;

    fn into_iter(self,) -> Self::IntoIter
    {
        self.handles.iter()
    }
}

/// Builds the roster as `((contributors ∪ authors) − ignore) ∪ include`.
///
/// The include set is applied after ignore removal, so a handle listed in
/// both ends up in the roster. Spellings from `include` replace any other
/// spelling of the same handle. The output is sorted case-insensitively and
/// may be empty.
///
/// # Examples
///
/// ```
/// use collage::{HandleSet, build_roster};
///
/// let ignore: HandleSet = ["bob",].into_iter().collect();
/// let include: HandleSet = ["dave",].into_iter().collect();
/// let roster = build_roster(["alice", "bob",], ["carol",], &ignore, &include,);
/// assert_eq!(roster.handles(), ["alice", "carol", "dave"]);
/// ```
pub fn build_roster<C, A, H1, H2,>(
    contributors: C,
    authors: A,
    ignore: &HandleSet,
    include: &HandleSet,
) -> Roster
where
    C: IntoIterator<Item = H1,>,
    A: IntoIterator<Item = H2,>,
    H1: Into<String,>,
    H2: Into<String,>,
{
    let mut merged = HandleSet::new();
    merged.extend(contributors,);
    merged.extend(authors,);

    merged.entries.retain(|key, _| !ignore.entries.contains_key(key,),);

    for (key, spelling,) in &include.entries {
        merged.entries.insert(key.clone(), spelling.clone(),);
    }

    Roster {
        handles: merged.entries.into_values().collect(),
    }
}

fn fold(handle: &str,) -> String
{
    handle.to_lowercase()
}
