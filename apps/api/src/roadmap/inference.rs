//! Skill Inference: maps free-text role descriptions and a job profile to an
//! ordered, deduplicated list of canonical skill names.
//!
//! Pure keyword matching over immutable tables (`InferenceRules`). No learned
//! model, no randomness: the same input always yields the same output in the
//! same order.

use std::sync::Arc;

use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Rule tables
// ────────────────────────────────────────────────────────────────────────────

/// Any of `keywords` appearing in a role adds all of `skills`.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub skills: Vec<String>,
}

/// A technology token mentioned directly in a role, added under its canonical name.
#[derive(Debug, Clone)]
pub struct TokenRule {
    pub token: String,
    pub skill: String,
}

/// Default skill set for a job-profile category, used only when roles yield nothing.
#[derive(Debug, Clone)]
pub struct ProfileFallback {
    pub category: String,
    pub markers: Vec<String>,
    pub skills: Vec<String>,
}

/// Immutable configuration for `SkillInferenceEngine`. Tables are scanned in
/// declaration order.
#[derive(Debug, Clone)]
pub struct InferenceRules {
    pub keyword_rules: Vec<KeywordRule>,
    pub token_rules: Vec<TokenRule>,
    pub profile_fallbacks: Vec<ProfileFallback>,
    pub default_skills: Vec<String>,
}

const KEYWORD_TABLE: &[(&[&str], &[&str])] = &[
    (
        &["frontend", "front-end", "front end"],
        &["HTML/CSS", "JavaScript", "React", "UI Design"],
    ),
    (
        &["backend", "back-end", "back end", "server-side"],
        &["Node.js", "Express", "Databases", "API Design"],
    ),
    (
        &["full stack", "fullstack", "full-stack"],
        &["HTML/CSS", "JavaScript", "React", "Node.js", "Databases"],
    ),
    (
        &["rest", "api", "apis", "microservice", "microservices"],
        &["API Design"],
    ),
    (
        &["database", "databases", "data modeling"],
        &["Databases", "SQL"],
    ),
    (
        &["machine learning", "ml", "deep learning", "ai"],
        &["Python", "Machine Learning", "Statistics"],
    ),
    (
        &["data analysis", "data analytics", "analytics", "data science"],
        &["Python", "SQL", "Statistics", "Data Visualization"],
    ),
    (
        &["cloud", "devops", "infrastructure"],
        &["AWS", "Docker", "Kubernetes", "CI/CD"],
    ),
    (
        &["security", "cybersecurity", "penetration", "vulnerability"],
        &["Network Security", "Cryptography", "Linux"],
    ),
    (
        &["mobile", "android", "ios"],
        &["Mobile Development"],
    ),
    (
        &["testing", "test automation", "qa", "quality assurance"],
        &["Software Testing"],
    ),
    (
        &["algorithms", "data structures", "problem solving", "problem-solving"],
        &["Data Structures & Algorithms", "Problem Solving"],
    ),
    (
        &["scalable", "scalability", "distributed", "system design", "architecture"],
        &["System Design"],
    ),
    (
        &["ui", "ux", "user interface", "user experience"],
        &["UI Design"],
    ),
];

const TOKEN_TABLE: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("react", "React"),
    ("angular", "Angular"),
    ("vue", "Vue.js"),
    ("next.js", "Next.js"),
    ("node", "Node.js"),
    ("nodejs", "Node.js"),
    ("express", "Express"),
    ("python", "Python"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("java", "Java"),
    ("spring", "Spring Boot"),
    ("kotlin", "Kotlin"),
    ("swift", "Swift"),
    ("golang", "Go"),
    ("rust", "Rust"),
    ("c++", "C++"),
    ("c#", "C#"),
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("postgres", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("redis", "Redis"),
    ("graphql", "GraphQL"),
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("gcp", "Google Cloud"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("git", "Git"),
    ("linux", "Linux"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("pandas", "Pandas"),
    ("html", "HTML/CSS"),
    ("css", "HTML/CSS"),
    ("figma", "Figma"),
];

// Order matters: "full stack" is checked before the frontend/backend markers.
const PROFILE_TABLE: &[(&str, &[&str], &[&str])] = &[
    (
        "fullstack",
        &["full stack", "fullstack", "full-stack", "mern", "mean"],
        &["JavaScript", "React", "Node.js", "Databases"],
    ),
    (
        "frontend",
        &["frontend", "front-end", "front end", "ui", "web developer"],
        &["HTML/CSS", "JavaScript", "React", "UI Design"],
    ),
    (
        "backend",
        &["backend", "back-end", "back end", "server", "api"],
        &["Node.js", "Databases", "API Design", "System Design"],
    ),
    (
        "data",
        &["data", "analyst", "machine learning", "ml", "ai", "scientist"],
        &["Python", "SQL", "Statistics", "Data Visualization"],
    ),
    (
        "security",
        &["security", "cyber", "penetration", "soc"],
        &["Network Security", "Cryptography", "Linux"],
    ),
    (
        "cloud",
        &["cloud", "devops", "sre", "site reliability", "infrastructure"],
        &["AWS", "Docker", "Kubernetes"],
    ),
];

const DEFAULT_SKILLS: &[&str] = &[
    "Programming Fundamentals",
    "Data Structures & Algorithms",
    "System Design",
    "Problem Solving",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl InferenceRules {
    /// The built-in placement-portal tables.
    pub fn builtin() -> Self {
        InferenceRules {
            keyword_rules: KEYWORD_TABLE
                .iter()
                .map(|(keywords, skills)| KeywordRule {
                    keywords: owned(keywords),
                    skills: owned(skills),
                })
                .collect(),
            token_rules: TOKEN_TABLE
                .iter()
                .map(|(token, skill)| TokenRule {
                    token: token.to_string(),
                    skill: skill.to_string(),
                })
                .collect(),
            profile_fallbacks: PROFILE_TABLE
                .iter()
                .map(|(category, markers, skills)| ProfileFallback {
                    category: category.to_string(),
                    markers: owned(markers),
                    skills: owned(skills),
                })
                .collect(),
            default_skills: owned(DEFAULT_SKILLS),
        }
    }
}

impl Default for InferenceRules {
    fn default() -> Self {
        Self::builtin()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SkillInferenceEngine {
    rules: Arc<InferenceRules>,
}

impl SkillInferenceEngine {
    pub fn new(rules: Arc<InferenceRules>) -> Self {
        Self { rules }
    }

    /// Role-derived detection only. Returns an empty list when no role matches.
    ///
    /// Per role: keyword rules first, then direct technology tokens. Skills keep
    /// the order in which they were first detected.
    pub fn detect(&self, roles: &[String]) -> Vec<String> {
        let mut detected: Vec<String> = Vec::new();

        for role in roles {
            let role_lower = role.to_lowercase();

            for rule in &self.rules.keyword_rules {
                if rule
                    .keywords
                    .iter()
                    .any(|kw| contains_term(&role_lower, &kw.to_lowercase()))
                {
                    for skill in &rule.skills {
                        push_unique(&mut detected, skill);
                    }
                }
            }

            for rule in &self.rules.token_rules {
                if contains_term(&role_lower, &rule.token.to_lowercase()) {
                    push_unique(&mut detected, &rule.skill);
                }
            }
        }

        detected
    }

    /// Category default for a job profile; the generic default when no category matches.
    pub fn fallback(&self, job_profile: &str) -> Vec<String> {
        self.fallback_category(job_profile)
            .map(|fb| {
                debug!(job_profile, category = %fb.category, "Using profile fallback skills");
                fb.skills.clone()
            })
            .unwrap_or_else(|| {
                debug!(job_profile, "Using generic default skills");
                self.rules.default_skills.clone()
            })
    }

    /// First profile category whose markers appear in the job profile.
    pub fn fallback_category(&self, job_profile: &str) -> Option<&ProfileFallback> {
        let profile_lower = job_profile.to_lowercase();
        self.rules.profile_fallbacks.iter().find(|fb| {
            fb.markers
                .iter()
                .any(|m| contains_term(&profile_lower, &m.to_lowercase()))
        })
    }

    /// Detection with fallback. The fallback never merges with detected skills:
    /// it applies only when detection is empty.
    pub fn infer(&self, job_profile: &str, roles: &[String]) -> Vec<String> {
        let detected = self.detect(roles);
        if detected.is_empty() {
            return self.fallback(job_profile);
        }
        detected
    }
}

fn push_unique(skills: &mut Vec<String>, skill: &str) {
    let key = skill.to_lowercase();
    if !skills.iter().any(|s| s.to_lowercase() == key) {
        skills.push(skill.to_string());
    }
}

/// Substring match anchored on word boundaries: the characters either side of
/// the match must not be alphanumeric. Keeps "java" out of "javascript" and
/// "go" out of "mongodb". A version suffix after a term ending in a letter
/// still counts as a boundary, so "html5" and "python3" match.
pub(crate) fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let versionable = needle
        .chars()
        .next_back()
        .map_or(false, |c| c.is_alphabetic());
    haystack.match_indices(needle).any(|(start, _)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[start + needle.len()..]
            .chars()
            .next()
            .map_or(true, |c| {
                !c.is_alphanumeric() || (versionable && c.is_ascii_digit())
            });
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SkillInferenceEngine {
        SkillInferenceEngine::new(Arc::new(InferenceRules::builtin()))
    }

    fn roles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_backend_node_mongodb_roles() {
        let skills = engine().detect(&roles(&[
            "Design and develop backend REST APIs using Node.js",
            "Work with MongoDB",
        ]));
        assert_eq!(
            skills,
            vec!["Node.js", "Express", "Databases", "API Design", "MongoDB"]
        );
    }

    #[test]
    fn test_frontend_keyword_expands_to_skill_group() {
        let skills = engine().detect(&roles(&["Own the frontend of our dashboard"]));
        assert_eq!(skills, vec!["HTML/CSS", "JavaScript", "React", "UI Design"]);
    }

    #[test]
    fn test_tokens_respect_word_boundaries() {
        let skills = engine().detect(&roles(&["Write JavaScript against MongoDB"]));
        assert!(skills.contains(&"JavaScript".to_string()));
        assert!(!skills.contains(&"Java".to_string()));
        assert!(!skills.contains(&"Go".to_string()));
    }

    #[test]
    fn test_symbol_tokens_match() {
        let skills = engine().detect(&roles(&["Maintain C++ and C# services"]));
        assert_eq!(skills, vec!["C++", "C#"]);
    }

    #[test]
    fn test_duplicates_collapse_across_roles() {
        let skills = engine().detect(&roles(&["Build React components", "Test React hooks"]));
        assert_eq!(skills.iter().filter(|s| *s == "React").count(), 1);
    }

    #[test]
    fn test_no_roles_falls_back_to_profile_category() {
        let skills = engine().infer("Frontend Developer", &[]);
        assert_eq!(skills, vec!["HTML/CSS", "JavaScript", "React", "UI Design"]);
    }

    #[test]
    fn test_full_stack_profile_beats_frontend_backend() {
        let skills = engine().infer("Full Stack Engineer", &[]);
        assert_eq!(skills, vec!["JavaScript", "React", "Node.js", "Databases"]);
    }

    #[test]
    fn test_unknown_profile_gets_generic_default() {
        let skills = engine().infer("Graduate Engineer Trainee", &roles(&["Attend standups"]));
        assert_eq!(
            skills,
            vec![
                "Programming Fundamentals",
                "Data Structures & Algorithms",
                "System Design",
                "Problem Solving"
            ]
        );
    }

    #[test]
    fn test_fallback_not_merged_with_detection() {
        let skills = engine().infer("Security Analyst", &roles(&["Build dashboards in React"]));
        assert_eq!(skills, vec!["React"]);
    }

    #[test]
    fn test_every_fallback_is_non_empty() {
        let engine = engine();
        for profile in ["", "SDE", "Data Analyst", "Cloud Engineer", "Backend", "Security"] {
            let skills = engine.infer(profile, &[]);
            assert!((3..=4).contains(&skills.len()), "{profile}: {skills:?}");
        }
    }

    #[test]
    fn test_fixture_rules_are_honoured() {
        let rules = InferenceRules {
            keyword_rules: vec![KeywordRule {
                keywords: vec!["embedded".to_string()],
                skills: vec!["C".to_string(), "RTOS".to_string()],
            }],
            token_rules: vec![],
            profile_fallbacks: vec![],
            default_skills: vec!["Fixture Default".to_string()],
        };
        let engine = SkillInferenceEngine::new(Arc::new(rules));
        assert_eq!(engine.detect(&roles(&["Embedded firmware"])), vec!["C", "RTOS"]);
        assert_eq!(engine.infer("Frontend", &[]), vec!["Fixture Default"]);
    }

    #[test]
    fn test_contains_term_boundaries() {
        assert!(contains_term("using node.js daily", "node"));
        assert!(contains_term("c++ developer", "c++"));
        assert!(!contains_term("mongodb", "go"));
        assert!(!contains_term("javascript", "java"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_version_suffixes_still_match() {
        assert!(contains_term("html5/css3 pages", "html"));
        assert!(contains_term("html5/css3 pages", "css"));
        assert!(contains_term("python3 scripts", "python"));
        assert!(!contains_term("4python", "python"));

        let skills = engine().detect(&roles(&[
            "Build HTML5/CSS3 pages",
            "Automate reports with python3 scripts",
        ]));
        assert_eq!(skills, vec!["HTML/CSS", "Python"]);
    }

    #[test]
    fn test_fallback_category_is_reported() {
        let engine = engine();
        assert_eq!(
            engine.fallback_category("Cloud Engineer").map(|fb| fb.category.as_str()),
            Some("cloud")
        );
        assert!(engine.fallback_category("Graduate Engineer Trainee").is_none());
    }

    #[test]
    fn test_non_ascii_detected_names_stay_distinct() {
        let rules = InferenceRules {
            keyword_rules: vec![KeywordRule {
                keywords: vec!["分析".to_string()],
                skills: vec!["データ分析".to_string(), "機械学習".to_string(), "データ分析".to_string()],
            }],
            token_rules: vec![],
            profile_fallbacks: vec![],
            default_skills: vec![],
        };
        let engine = SkillInferenceEngine::new(Arc::new(rules));
        assert_eq!(engine.detect(&roles(&["売上 分析"])), vec!["データ分析", "機械学習"]);
    }
}
