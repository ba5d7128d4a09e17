use serde::{Deserialize, Serialize};

/// Resume coverage of one skill area named by the job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScore {
    pub name: String,
    /// Backend-assigned level string ("low" | "medium" | "high"),
    /// displayed verbatim.
    pub level: String,
}

/// Match score between a job description and a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub skills: Vec<SkillScore>,
    pub gaps: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_result_parses_backend_shape() {
        let json = r#"{
            "score": 0.42,
            "skills": [{"name": "Python", "level": "high"}],
            "gaps": ["Kubernetes"]
        }"#;
        let result: MatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.skills[0].level, "high");
        assert_eq!(result.gaps, vec!["Kubernetes".to_string()]);
    }
}
