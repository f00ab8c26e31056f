//! Contact records, coalescing, and display names.
//!
//! CHANGELOG:
//! - 10/18/2026 - Display-name fallback chain for group conversations
//! - 10/18/2026 - Coalescing of split records across contact sources

use serde::Serialize;
use std::collections::HashMap;

use super::normalize::normalize_identifier;

/// One real-world person as found in a contact source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    /// Stable source id (`<source label>:<primary key>`).
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// E.164 phone numbers, in source order.
    pub phone_numbers: Vec<String>,
    /// Trimmed email addresses, in source order.
    pub email_addresses: Vec<String>,
}

impl ContactRecord {
    pub fn new(
        id: impl Into<String>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: clean_name(first_name),
            last_name: clean_name(last_name),
            phone_numbers: Vec::new(),
            email_addresses: Vec::new(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.add_phone(phone);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.add_email(email);
        self
    }

    pub fn add_phone(&mut self, phone: impl Into<String>) {
        push_unique(&mut self.phone_numbers, phone.into());
    }

    pub fn add_email(&mut self, email: impl Into<String>) {
        push_unique(&mut self.email_addresses, email.into());
    }

    /// Deduplicated union of phone numbers and email addresses.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers = Vec::with_capacity(self.phone_numbers.len() + self.email_addresses.len());
        for identifier in self.phone_numbers.iter().chain(&self.email_addresses) {
            push_unique(&mut identifiers, identifier.clone());
        }
        identifiers
    }

    pub fn has_identifiers(&self) -> bool {
        !self.phone_numbers.is_empty() || !self.email_addresses.is_empty()
    }

    /// Whether the given handle/identifier belongs to this contact.
    pub fn owns_identifier(&self, identifier: &str) -> bool {
        let wanted = normalize_identifier(identifier);
        self.identifiers()
            .iter()
            .any(|own| normalize_identifier(own) == wanted)
    }

    /// "First Last", or whichever part exists.
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }

    /// Shortest unambiguous label for this record within `records`.
    ///
    /// First name if unique, else full name if unique, else first phone
    /// number if no other record carries it, else first email address if no
    /// other record carries it, else full name.
    pub fn display_name(&self, records: &[ContactRecord]) -> String {
        let others: Vec<&ContactRecord> = records.iter().filter(|r| r.id != self.id).collect();

        if let Some(first) = &self.first_name {
            if !others.iter().any(|r| r.first_name.as_ref() == Some(first)) {
                return first.clone();
            }
        }

        let full_name = self.full_name();
        if let Some(full) = &full_name {
            if !others.iter().any(|r| r.full_name().as_ref() == Some(full)) {
                return full.clone();
            }
        }

        if let Some(phone) = self.phone_numbers.first() {
            if !others.iter().any(|r| r.phone_numbers.contains(phone)) {
                return phone.clone();
            }
        }

        if let Some(email) = self.email_addresses.first() {
            let email_lower = email.to_lowercase();
            if !others.iter().any(|r| {
                r.email_addresses
                    .iter()
                    .any(|e| e.to_lowercase() == email_lower)
            }) {
                return email.clone();
            }
        }

        full_name
            .or_else(|| self.identifiers().into_iter().next())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// Merge records whose identifier sets intersect (transitively).
///
/// The merged record keeps the first member's id, fills missing name fields
/// from the first member that has them, and keeps identifiers in member
/// order. Records without identifiers are never merged. Idempotent.
pub fn coalesce(records: Vec<ContactRecord>) -> Vec<ContactRecord> {
    let mut parent: Vec<usize> = (0..records.len()).collect();
    let mut owner_by_identifier: HashMap<String, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        for identifier in record.identifiers() {
            let key = normalize_identifier(&identifier);
            match owner_by_identifier.get(&key) {
                Some(&owner) => union(&mut parent, owner, index),
                None => {
                    owner_by_identifier.insert(key, index);
                }
            }
        }
    }

    let mut group_order: Vec<usize> = Vec::new();
    let mut groups: HashMap<usize, Vec<ContactRecord>> = HashMap::new();
    for (index, record) in records.into_iter().enumerate() {
        let root = find(&mut parent, index);
        if !groups.contains_key(&root) {
            group_order.push(root);
        }
        groups.entry(root).or_default().push(record);
    }

    group_order
        .into_iter()
        .filter_map(|root| groups.remove(&root))
        .filter_map(merge_group)
        .collect()
}

fn merge_group(members: Vec<ContactRecord>) -> Option<ContactRecord> {
    let mut members = members.into_iter();
    let mut merged = members.next()?;
    for member in members {
        if merged.first_name.is_none() {
            merged.first_name = member.first_name;
        }
        if merged.last_name.is_none() {
            merged.last_name = member.last_name;
        }
        for phone in member.phone_numbers {
            push_unique(&mut merged.phone_numbers, phone);
        }
        for email in member.email_addresses {
            push_unique(&mut merged.email_addresses, email);
        }
    }
    Some(merged)
}

fn find(parent: &mut [usize], mut index: usize) -> usize {
    while parent[index] != index {
        parent[index] = parent[parent[index]];
        index = parent[index];
    }
    index
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find(parent, a);
    let root_b = find(parent, b);
    if root_a != root_b {
        // Lower index stays root so the earliest record leads the group
        let (root, child) = if root_a < root_b { (root_a, root_b) } else { (root_b, root_a) };
        parent[child] = root;
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn clean_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
