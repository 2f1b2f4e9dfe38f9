use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::resume::attributes::ResumeAttributes;

/// Process-unique candidate identifier, assigned monotonically from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracted candidate attributes. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub name: String,
    pub resume_filename: String,
    pub domain: String,
    pub experience_years: u32,
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub job_titles: Vec<String>,
    pub github_links: Vec<String>,
    pub linkedin_links: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Session-lifetime candidate collection, kept in creation order.
#[derive(Debug)]
pub struct CandidateStore {
    records: Vec<CandidateRecord>,
    next_id: u64,
}

impl Default for CandidateStore {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record for freshly parsed attributes. Ids are never reused.
    pub fn create(
        &mut self,
        attributes: ResumeAttributes,
        resume_filename: &str,
    ) -> &CandidateRecord {
        let id = CandidateId(self.next_id);
        self.next_id += 1;

        let ResumeAttributes {
            full_name,
            skills,
            years_of_experience,
            relevant_domain,
            github_links,
            linkedin_links,
            projects,
            past_job_titles,
        } = attributes;

        info!("Created candidate {id} ({full_name}) from {resume_filename}");

        self.records.push(CandidateRecord {
            id,
            name: full_name,
            resume_filename: resume_filename.to_string(),
            domain: relevant_domain,
            experience_years: years_of_experience,
            skills,
            projects,
            job_titles: past_job_titles,
            github_links,
            linkedin_links,
            created_at: Utc::now(),
        });
        &self.records[self.records.len() - 1]
    }

    pub fn get(&self, id: CandidateId) -> Option<&CandidateRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn list_all(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_attributes(name: &str) -> ResumeAttributes {
    ResumeAttributes {
        full_name: name.to_string(),
        skills: vec!["Rust".to_string(), "Kubernetes".to_string()],
        years_of_experience: 4,
        relevant_domain: "Backend".to_string(),
        github_links: vec![],
        linkedin_links: vec![],
        projects: vec!["Payments ledger".to_string()],
        past_job_titles: vec!["Software Engineer".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_from_one() {
        let mut store = CandidateStore::new();
        let a = store.create(sample_attributes("Jane Doe"), "jane.pdf").id;
        let b = store.create(sample_attributes("John Roe"), "john.pdf").id;
        assert_eq!(a, CandidateId(1));
        assert_eq!(b, CandidateId(2));
    }

    #[test]
    fn test_list_all_preserves_creation_order() {
        let mut store = CandidateStore::new();
        store.create(sample_attributes("First"), "1.pdf");
        store.create(sample_attributes("Second"), "2.pdf");
        store.create(sample_attributes("Third"), "3.pdf");
        let names: Vec<_> = store.list_all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_maps_attributes() {
        let mut store = CandidateStore::new();
        let id = store.create(sample_attributes("Jane Doe"), "jane.pdf").id;
        let record = store.get(id).unwrap();
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.domain, "Backend");
        assert_eq!(record.experience_years, 4);
        assert_eq!(record.job_titles, vec!["Software Engineer".to_string()]);
        assert_eq!(record.resume_filename, "jane.pdf");
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let store = CandidateStore::new();
        assert!(store.is_empty());
        assert!(store.get(CandidateId(7)).is_none());
    }
}
