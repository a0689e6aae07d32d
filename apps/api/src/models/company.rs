use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The slice of a company record that roadmap generation reads. Both list
/// fields may be empty or absent in the source data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyProfile {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "jobProfile")]
    pub job_profile: String,
    #[serde(default, alias = "requiredSkills")]
    pub required_skills: Vec<String>,
    #[serde(default, alias = "rolesAndResponsibilities")]
    pub roles_and_responsibilities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_deserialize_as_empty() {
        let json = r#"{"id": "6f1c1c1e-8a2b-4c1e-9a7e-2f0a4b1c9d10", "name": "Acme"}"#;
        let company: CompanyProfile = serde_json::from_str(json).unwrap();
        assert!(company.required_skills.is_empty());
        assert!(company.roles_and_responsibilities.is_empty());
        assert_eq!(company.job_profile, "");
    }

    #[test]
    fn test_camel_case_fields_accepted() {
        let json = r#"{
            "id": "6f1c1c1e-8a2b-4c1e-9a7e-2f0a4b1c9d10",
            "jobProfile": "Backend Engineer",
            "requiredSkills": ["Go"],
            "rolesAndResponsibilities": ["Build services"]
        }"#;
        let company: CompanyProfile = serde_json::from_str(json).unwrap();
        assert_eq!(company.job_profile, "Backend Engineer");
        assert_eq!(company.required_skills, vec!["Go".to_string()]);
        assert_eq!(company.roles_and_responsibilities.len(), 1);
    }
}
