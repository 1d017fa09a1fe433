use crate::domain::{History, Module, Snapshot, Status, Subject};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Body of `GET /api/modules`.
#[derive(Debug, Deserialize)]
pub struct ModulesResponse {
    pub current: CurrentState,
    #[serde(default)]
    pub historical: BTreeMap<String, History>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentState {
    #[serde(default)]
    pub modules: BTreeMap<String, WireModule>,
    #[serde(default)]
    pub last_reset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireModule {
    #[serde(default)]
    pub subjects: Vec<WireSubject>,
}

#[derive(Debug, Deserialize)]
pub struct WireSubject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<Status>,
}

/// Body of `GET /api/module/<name>`.
#[derive(Debug, Deserialize)]
pub struct ModuleResponse {
    #[serde(default)]
    pub current: WireModule,
    #[serde(default)]
    pub historical: History,
}

#[derive(Debug, Serialize)]
pub struct ProgressRequest<'a> {
    pub module: &'a str,
    pub subject: &'a str,
    pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct DeleteSubjectRequest<'a> {
    pub module: &'a str,
    pub subject: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteModuleRequest<'a> {
    pub module: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RenameModuleRequest<'a> {
    #[serde(rename = "oldName")]
    pub old_name: &'a str,
    #[serde(rename = "newName")]
    pub new_name: &'a str,
}

/// Success/failure envelope returned by the mutation endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: Option<String>,
}

impl ModulesResponse {
    pub fn into_snapshot(self) -> Snapshot {
        let modules = self
            .current
            .modules
            .into_iter()
            .filter_map(|(name, module)| {
                if name.trim().is_empty() {
                    warn!("dropping module with an empty name");
                    return None;
                }
                let subjects = sanitize_subjects(&name, module.subjects);
                Some((name, subjects))
            })
            .collect();

        Snapshot::new(modules, self.historical, self.current.last_reset)
    }
}

impl ModuleResponse {
    pub fn into_module(self, name: &str) -> Module {
        Module {
            name: name.to_string(),
            subjects: sanitize_subjects(name, self.current.subjects),
            history: self.historical,
        }
    }
}

fn sanitize_subjects(module: &str, subjects: Vec<WireSubject>) -> Vec<Subject> {
    let mut seen = HashSet::new();
    subjects
        .into_iter()
        .filter_map(|subject| {
            if subject.name.trim().is_empty() {
                warn!(module, "dropping subject with an empty name");
                return None;
            }
            if !seen.insert(subject.name.clone()) {
                warn!(module, subject = %subject.name, "dropping duplicate subject");
                return None;
            }
            Some(Subject::new(
                subject.name,
                subject.status.unwrap_or(Status::NotDone),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_modules_payload() {
        let body = r#"{
            "current": {
                "modules": {
                    "Math": {"subjects": [
                        {"name": "Algebra", "status": "Done"},
                        {"name": "Analysis", "status": "bogus"}
                    ]},
                    "Law": {"subjects": []}
                },
                "last_reset": "2024-03-01"
            },
            "historical": {"Math": {"2024-03-01": 2, "2024-03-02": 3}}
        }"#;

        let snapshot = serde_json::from_str::<ModulesResponse>(body)
            .unwrap()
            .into_snapshot();

        assert_eq!(snapshot.module_count(), 2);
        assert_eq!(snapshot.last_reset(), Some("2024-03-01"));
        let math = snapshot.module("Math").unwrap();
        assert_eq!(math.subjects[0].status, Status::Done);
        assert_eq!(math.subjects[1].status, Status::NotDone);
        assert_eq!(math.historical_total(), 5);
        assert_eq!(snapshot.module("Law").unwrap().historical_total(), 0);
    }

    #[test]
    fn drops_records_that_break_naming_rules() {
        let body = r#"{
            "current": {"modules": {
                "": {"subjects": [{"name": "x", "status": "Done"}]},
                "Math": {"subjects": [
                    {"name": "Algebra", "status": "Done"},
                    {"name": "Algebra", "status": "vide"},
                    {"name": "  ", "status": "Done"},
                    {"status": "Done"}
                ]}
            }}
        }"#;

        let snapshot = serde_json::from_str::<ModulesResponse>(body)
            .unwrap()
            .into_snapshot();

        assert_eq!(snapshot.module_names().collect::<Vec<_>>(), vec!["Math"]);
        let math = snapshot.module("Math").unwrap();
        assert_eq!(math.subjects, vec![Subject::new("Algebra", Status::Done)]);
    }

    #[test]
    fn rename_request_uses_camel_case_keys() {
        let body = serde_json::to_value(RenameModuleRequest {
            old_name: "Math",
            new_name: "Maths",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"oldName": "Math", "newName": "Maths"}));
    }

    #[test]
    fn progress_request_carries_wire_status() {
        let body = serde_json::to_value(ProgressRequest {
            module: "Math",
            subject: "Algebra",
            status: Status::InProgress,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"module": "Math", "subject": "Algebra", "status": "En cours"})
        );
    }
}
