//! Resource Catalog: builds the learning-resource list for a skill.
//!
//! Every skill gets the same five-slot shape:
//!   0. beginner tutorial (video)
//!   1. documentation
//!   2. best practices (article)
//!   3. interview preparation (article)
//!   4. project walkthrough (video)
//!
//! Curated skills may append extra entries (e.g. a course). Resource ids are
//! `<skill-slug>-<index>` and never depend on time or randomness.

use std::sync::Arc;

use crate::models::roadmap::{Resource, ResourceType, Skill};
use crate::roadmap::inference::contains_term;

// ────────────────────────────────────────────────────────────────────────────
// Curated tables
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CuratedResource {
    pub title: String,
    pub resource_type: ResourceType,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CuratedSkill {
    pub name: String,
    pub description: String,
    pub resources: Vec<CuratedResource>,
}

/// Immutable configuration for `ResourceCatalog`.
#[derive(Debug, Clone, Default)]
pub struct CatalogRules {
    pub curated: Vec<CuratedSkill>,
}

type CuratedRow = (&'static str, ResourceType, &'static str, &'static str);

const CURATED_TABLE: &[(&str, &str, &[CuratedRow])] = &[
    (
        "React",
        "Component-based UI development with hooks, state and effects.",
        &[
            ("React Tutorial for Beginners", ResourceType::Video, "https://www.youtube.com/results?search_query=react+tutorial+for+beginners", "Components, props and JSX from scratch."),
            ("React Docs: Learn React", ResourceType::Documentation, "https://react.dev/learn", "The official guide, from first component to managing state."),
            ("Thinking in React", ResourceType::Article, "https://react.dev/learn/thinking-in-react", "How to break a UI into components and decide where state lives."),
            ("React Interview Questions", ResourceType::Article, "https://www.google.com/search?q=react+interview+questions", "Common questions on hooks, reconciliation and rendering."),
            ("Build a React Project", ResourceType::Video, "https://www.youtube.com/results?search_query=react+project+tutorial", "An end-to-end app built step by step."),
            ("Full Stack Open", ResourceType::Course, "https://fullstackopen.com/en/", "University of Helsinki course covering React and Node.js."),
        ],
    ),
    (
        "JavaScript",
        "The language of the web: types, closures, async programming and the DOM.",
        &[
            ("JavaScript Tutorial for Beginners", ResourceType::Video, "https://www.youtube.com/results?search_query=javascript+tutorial+for+beginners", "Syntax, functions and the DOM for first-timers."),
            ("MDN JavaScript Guide", ResourceType::Documentation, "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide", "Mozilla's reference guide to the language."),
            ("The Modern JavaScript Tutorial", ResourceType::Article, "https://javascript.info/", "In-depth coverage of idiomatic modern JavaScript."),
            ("JavaScript Interview Questions", ResourceType::Article, "https://www.google.com/search?q=javascript+interview+questions", "Closures, hoisting, the event loop and prototypes."),
            ("Build JavaScript Projects", ResourceType::Video, "https://www.youtube.com/results?search_query=javascript+projects+for+beginners", "Small vanilla-JS projects to cement the basics."),
            ("JavaScript30", ResourceType::Project, "https://javascript30.com/", "Thirty small browser projects, one a day, no frameworks."),
        ],
    ),
    (
        "Node.js",
        "Server-side JavaScript: the event loop, modules, streams and HTTP services.",
        &[
            ("Node.js Tutorial for Beginners", ResourceType::Video, "https://www.youtube.com/results?search_query=node.js+tutorial+for+beginners", "Modules, npm and a first HTTP server."),
            ("Node.js Learn", ResourceType::Documentation, "https://nodejs.org/en/learn", "Official introduction and guides."),
            ("Node.js Best Practices", ResourceType::Article, "https://github.com/goldbergyoni/nodebestpractices", "Community-maintained list of production practices."),
            ("Node.js Interview Questions", ResourceType::Article, "https://www.google.com/search?q=node.js+interview+questions", "Event loop, streams, clustering and error handling."),
            ("Build a REST API with Node.js", ResourceType::Video, "https://www.youtube.com/results?search_query=node.js+rest+api+project", "A complete API with routing and persistence."),
        ],
    ),
    (
        "Python",
        "General-purpose programming with Python's standard library and idioms.",
        &[
            ("Python Tutorial for Beginners", ResourceType::Video, "https://www.youtube.com/results?search_query=python+tutorial+for+beginners", "Variables, control flow and functions."),
            ("The Python Tutorial", ResourceType::Documentation, "https://docs.python.org/3/tutorial/", "The official tutorial from python.org."),
            ("PEP 8: Style Guide for Python Code", ResourceType::Article, "https://peps.python.org/pep-0008/", "Conventions every Python codebase expects."),
            ("Python Interview Questions", ResourceType::Article, "https://www.google.com/search?q=python+interview+questions", "Data model, generators, decorators and the GIL."),
            ("Build Python Projects", ResourceType::Video, "https://www.youtube.com/results?search_query=python+projects+tutorial", "Hands-on projects from scripts to small apps."),
        ],
    ),
    (
        "SQL",
        "Querying and modelling relational data: joins, aggregation and indexing.",
        &[
            ("SQL Tutorial for Beginners", ResourceType::Video, "https://www.youtube.com/results?search_query=sql+tutorial+for+beginners", "SELECT, JOIN and GROUP BY from the ground up."),
            ("PostgreSQL Tutorial", ResourceType::Documentation, "https://www.postgresql.org/docs/current/tutorial.html", "The official PostgreSQL tutorial."),
            ("Use The Index, Luke", ResourceType::Article, "https://use-the-index-luke.com/", "SQL indexing and tuning for developers."),
            ("SQL Interview Questions", ResourceType::Article, "https://www.google.com/search?q=sql+interview+questions", "Joins, window functions and normalization."),
            ("SQL Project Walkthrough", ResourceType::Video, "https://www.youtube.com/results?search_query=sql+project+tutorial", "Design and query a database for a real dataset."),
        ],
    ),
    (
        "HTML/CSS",
        "Semantic markup and modern layout with flexbox and grid.",
        &[
            ("HTML & CSS Crash Course", ResourceType::Video, "https://www.youtube.com/results?search_query=html+css+crash+course", "Structure and style your first pages."),
            ("MDN Learn Web Development", ResourceType::Documentation, "https://developer.mozilla.org/en-US/docs/Learn", "Mozilla's structured web curriculum."),
            ("Learn CSS", ResourceType::Article, "https://web.dev/learn/css", "Layout, the cascade and responsive design."),
            ("HTML & CSS Interview Questions", ResourceType::Article, "https://www.google.com/search?q=html+css+interview+questions", "Box model, specificity, accessibility."),
            ("Build a Responsive Website", ResourceType::Video, "https://www.youtube.com/results?search_query=responsive+website+project+html+css", "A full landing page from mockup to markup."),
        ],
    ),
    (
        "Data Structures & Algorithms",
        "Core data structures, complexity analysis and problem-solving patterns.",
        &[
            ("Data Structures Easy to Advanced", ResourceType::Video, "https://www.youtube.com/results?search_query=data+structures+and+algorithms+full+course", "Arrays through graphs with complexity analysis."),
            ("Data Structures Reference", ResourceType::Documentation, "https://www.geeksforgeeks.org/data-structures/", "Reference articles per data structure."),
            ("Problem-Solving Patterns", ResourceType::Article, "https://www.google.com/search?q=coding+interview+patterns", "Two pointers, sliding window, BFS/DFS and more."),
            ("DSA Interview Questions", ResourceType::Article, "https://www.google.com/search?q=data+structures+and+algorithms+interview+questions", "Frequently asked placement-round problems."),
            ("Implement Data Structures from Scratch", ResourceType::Video, "https://www.youtube.com/results?search_query=implement+data+structures+from+scratch", "Build a hash map, heap and trie yourself."),
            ("NeetCode Roadmap", ResourceType::Course, "https://neetcode.io/roadmap", "A sequenced problem list grouped by pattern."),
        ],
    ),
    (
        "System Design",
        "Designing scalable services: caching, partitioning, queues and trade-offs.",
        &[
            ("System Design for Beginners", ResourceType::Video, "https://www.youtube.com/results?search_query=system+design+for+beginners", "Load balancers, caches and databases explained."),
            ("The System Design Primer", ResourceType::Documentation, "https://github.com/donnemartin/system-design-primer", "A broad open-source reference."),
            ("System Design Best Practices", ResourceType::Article, "https://www.google.com/search?q=system+design+best+practices", "Consistency, availability and capacity planning."),
            ("System Design Interview Questions", ResourceType::Article, "https://www.google.com/search?q=system+design+interview+questions", "URL shortener, chat, feed and friends."),
            ("Design a System End to End", ResourceType::Video, "https://www.youtube.com/results?search_query=system+design+mock+interview", "Mock interviews walking through full designs."),
        ],
    ),
    (
        "MongoDB",
        "Document modelling, querying and aggregation with MongoDB.",
        &[
            ("MongoDB Tutorial for Beginners", ResourceType::Video, "https://www.youtube.com/results?search_query=mongodb+tutorial+for+beginners", "Collections, documents and CRUD."),
            ("MongoDB Manual", ResourceType::Documentation, "https://www.mongodb.com/docs/manual/", "The official MongoDB manual."),
            ("MongoDB Schema Design Best Practices", ResourceType::Article, "https://www.google.com/search?q=mongodb+schema+design+best+practices", "Embedding versus referencing and index strategy."),
            ("MongoDB Interview Questions", ResourceType::Article, "https://www.google.com/search?q=mongodb+interview+questions", "Aggregation, sharding and replication."),
            ("Build a Project with MongoDB", ResourceType::Video, "https://www.youtube.com/results?search_query=mongodb+project+tutorial", "A full app backed by MongoDB."),
            ("MongoDB University", ResourceType::Course, "https://learn.mongodb.com/", "Free official courses."),
        ],
    ),
];

impl CatalogRules {
    /// The built-in curated catalog.
    pub fn builtin() -> Self {
        CatalogRules {
            curated: CURATED_TABLE
                .iter()
                .map(|(name, description, rows)| CuratedSkill {
                    name: name.to_string(),
                    description: description.to_string(),
                    resources: rows
                        .iter()
                        .map(|(title, resource_type, url, description)| CuratedResource {
                            title: title.to_string(),
                            resource_type: *resource_type,
                            url: url.to_string(),
                            description: description.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

/// Slot index of the project walkthrough; role context is attached here.
const PROJECT_SLOT: usize = 4;

#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    rules: Arc<CatalogRules>,
}

impl ResourceCatalog {
    pub fn new(rules: Arc<CatalogRules>) -> Self {
        Self { rules }
    }

    fn curated(&self, skill_name: &str) -> Option<&CuratedSkill> {
        let slug = skill_slug(skill_name);
        self.rules
            .curated
            .iter()
            .find(|c| skill_slug(&c.name) == slug)
    }

    /// Ordered resources for a skill. `role_context` only affects descriptions.
    pub fn resources_for(&self, skill_name: &str, role_context: &[String]) -> Vec<Resource> {
        let mut resources: Vec<Resource> = match self.curated(skill_name) {
            Some(curated) => curated
                .resources
                .iter()
                .enumerate()
                .map(|(index, r)| Resource {
                    id: resource_id(skill_name, index),
                    title: r.title.clone(),
                    resource_type: r.resource_type,
                    url: r.url.clone(),
                    description: r.description.clone(),
                })
                .collect(),
            None => templated_resources(skill_name),
        };

        if let Some(role) = matching_role(skill_name, role_context) {
            if let Some(project) = resources.get_mut(PROJECT_SLOT) {
                project.description = format!(
                    "{} Aim for something close to this role: \"{}\"",
                    project.description,
                    role.trim()
                );
            }
        }

        resources
    }

    pub fn describe(&self, skill_name: &str, job_profile: &str) -> String {
        match self.curated(skill_name) {
            Some(curated) => curated.description.clone(),
            None => format!("Core {skill_name} knowledge expected for {job_profile} roles."),
        }
    }

    /// Assembles one roadmap skill node.
    pub fn build_skill(&self, skill_name: &str, job_profile: &str, roles: &[String]) -> Skill {
        Skill {
            name: skill_name.to_string(),
            description: self.describe(skill_name, job_profile),
            resources: self.resources_for(skill_name, roles),
        }
    }
}

fn templated_resources(skill: &str) -> Vec<Resource> {
    let slots: [(String, ResourceType, String, String); 5] = [
        (
            format!("{skill} Tutorial for Beginners"),
            ResourceType::Video,
            youtube_search(&format!("{skill} tutorial for beginners")),
            format!("A beginner-friendly walkthrough of {skill} fundamentals."),
        ),
        (
            format!("{skill} Official Documentation"),
            ResourceType::Documentation,
            web_search(&format!("{skill} official documentation")),
            format!("Primary reference material for {skill}."),
        ),
        (
            format!("{skill} Best Practices"),
            ResourceType::Article,
            web_search(&format!("{skill} best practices")),
            format!("Conventions and pitfalls to know when working with {skill}."),
        ),
        (
            format!("{skill} Interview Questions"),
            ResourceType::Article,
            web_search(&format!("{skill} interview questions")),
            format!("Frequently asked {skill} questions in placement interviews."),
        ),
        (
            format!("Build a Project with {skill}"),
            ResourceType::Video,
            youtube_search(&format!("{skill} project tutorial")),
            format!("Apply {skill} end to end in a hands-on project."),
        ),
    ];

    slots
        .into_iter()
        .enumerate()
        .map(|(index, (title, resource_type, url, description))| Resource {
            id: resource_id(skill, index),
            title,
            resource_type,
            url,
            description,
        })
        .collect()
}

fn youtube_search(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

fn web_search(query: &str) -> String {
    format!("https://www.google.com/search?q={}", urlencoding::encode(query))
}

fn matching_role<'a>(skill_name: &str, roles: &'a [String]) -> Option<&'a String> {
    let needle = skill_name.to_lowercase();
    roles
        .iter()
        .find(|role| contains_term(&role.to_lowercase(), &needle))
}

/// URL- and id-safe form of a skill name.
///
/// Letters and digits (any script) are lowercased, a space becomes `-`, and
/// every other character is percent-encoded, `-` and `%` included. Distinct
/// names therefore never share a slug unless they differ only in case.
pub fn skill_slug(skill_name: &str) -> String {
    let name = skill_name.trim().to_lowercase();
    if name.is_empty() {
        return "skill".to_string();
    }

    let mut slug = String::with_capacity(name.len());
    let mut buf = [0u8; 4];
    for c in name.chars() {
        match c {
            c if c.is_alphanumeric() => slug.push(c),
            ' ' => slug.push('-'),
            '-' => slug.push_str("%2D"),
            c => slug.push_str(&urlencoding::encode(c.encode_utf8(&mut buf))),
        }
    }
    slug
}

/// Stable resource id: a pure function of skill name and slot index.
pub fn resource_id(skill_name: &str, index: usize) -> String {
    format!("{}-{}", skill_slug(skill_name), index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::new(Arc::new(CatalogRules::builtin()))
    }

    #[test]
    fn test_react_ids_are_deterministic() {
        let catalog = catalog();
        let first: Vec<String> = catalog.resources_for("React", &[]).into_iter().map(|r| r.id).collect();
        let second: Vec<String> = catalog.resources_for("React", &[]).into_iter().map(|r| r.id).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "react-0");
    }

    #[test]
    fn test_templated_skill_has_fixed_shape() {
        let resources = catalog().resources_for("Kotlin", &[]);
        assert_eq!(resources.len(), 5);
        let types: Vec<ResourceType> = resources.iter().map(|r| r.resource_type).collect();
        assert_eq!(
            types,
            vec![
                ResourceType::Video,
                ResourceType::Documentation,
                ResourceType::Article,
                ResourceType::Article,
                ResourceType::Video,
            ]
        );
        assert_eq!(resources[3].title, "Kotlin Interview Questions");
        assert!(resources[3].url.ends_with("Kotlin%20interview%20questions"));
    }

    #[test]
    fn test_every_curated_skill_has_at_least_five_resources() {
        for skill in &CatalogRules::builtin().curated {
            assert!(skill.resources.len() >= 5, "{} is short", skill.name);
            assert_eq!(skill.resources[0].resource_type, ResourceType::Video);
            assert_eq!(skill.resources[PROJECT_SLOT].resource_type, ResourceType::Video);
        }
    }

    #[test]
    fn test_curated_lookup_is_case_insensitive() {
        let resources = catalog().resources_for("node.JS", &[]);
        assert_eq!(resources[1].url, "https://nodejs.org/en/learn");
        assert_eq!(resources[1].id, "node.js-1");
    }

    #[test]
    fn test_role_context_cites_matching_role() {
        let roles = vec!["Ship features with Docker on every release".to_string()];
        let resources = catalog().resources_for("Docker", &roles);
        assert!(resources[PROJECT_SLOT].description.contains("Ship features with Docker"));
        assert!(!resources[0].description.contains("Ship features"));
    }

    #[test]
    fn test_role_context_does_not_change_ids() {
        let roles = vec!["Build React apps".to_string()];
        let with: Vec<String> = catalog().resources_for("React", &roles).into_iter().map(|r| r.id).collect();
        let without: Vec<String> = catalog().resources_for("React", &[]).into_iter().map(|r| r.id).collect();
        assert_eq!(with, without);
    }

    #[test]
    fn test_skill_slug() {
        assert_eq!(skill_slug("Node.js"), "node.js");
        assert_eq!(skill_slug("C++"), "c%2B%2B");
        assert_eq!(skill_slug("C#"), "c%23");
        assert_eq!(skill_slug("Data Structures & Algorithms"), "data-structures-%26-algorithms");
        assert_eq!(skill_slug("  HTML/CSS "), "html%2Fcss");
        assert_eq!(skill_slug("データ分析"), "データ分析");
        assert_eq!(skill_slug("   "), "skill");
    }

    #[test]
    fn test_skill_slug_keeps_distinct_names_apart() {
        let names = ["データ分析", "機械学習", "C++", "Cpp", "Node.js", "Node js", "Node-js", "a%2Db"];
        let slugs: std::collections::HashSet<String> = names.iter().map(|n| skill_slug(n)).collect();
        assert_eq!(slugs.len(), names.len());
        assert_eq!(skill_slug("REACT"), skill_slug("react"));
    }

    #[test]
    fn test_describe_templated() {
        let description = catalog().describe("Kotlin", "Android Developer");
        assert_eq!(description, "Core Kotlin knowledge expected for Android Developer roles.");
    }
}
