//! End-to-end tests over temporary rule corpora.

use rulebook::{
    anchor, frontmatter, rendered_body, Config, ImpactTier, PipelineError, Project, RunError,
    Severity,
};
use std::path::Path;
use tempfile::TempDir;

const METADATA: &str = r#"{
  "title": "React Best Practices",
  "version": "1.0.0",
  "organization": "Engineering",
  "date": "January 2026",
  "abstract": "Performance optimization guide.",
  "references": ["https://react.dev"]
}"#;

const ASYNC_PARALLEL: &str = "---
title: Promise.all() for Independent Operations
impact: CRITICAL
impactDescription: 2-10x improvement
tags: async, parallelization, promises
---

When async operations have no interdependencies, run them concurrently.

**Incorrect (sequential execution, 3 round trips):**

```typescript
const user = await fetchUser()
const posts = await fetchPosts()
```

**Correct (parallel execution, 1 round trip):**

```typescript
const [user, posts] = await Promise.all([fetchUser(), fetchPosts()])
```
";

const ASYNC_DEFER: &str = "---
title: Defer Await Until Needed
impact: HIGH
tags: async
---

**Incorrect:**

```ts
const data = await load()
if (skip) return
```

**Correct:**

```ts
if (skip) return
const data = await load()
```
";

const JS_SET: &str = "---
title: Use Set for Lookups
impact: LOW-MEDIUM
tags: javascript, collections
---

**Incorrect (O(n) per check):**

```js
ids.includes(id)
```

**Correct (O(1) per check):**

```js
idSet.has(id)
```
";

fn project(files: &[(&str, &str)]) -> (TempDir, Project) {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules");
    std::fs::create_dir(&rules).unwrap();
    for (name, content) in files {
        std::fs::write(rules.join(name), content).unwrap();
    }
    std::fs::write(dir.path().join("metadata.json"), METADATA).unwrap();
    let project = Project::new(dir.path(), Config::default());
    (dir, project)
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// Title, impact and body of the rule numbered `number` in a rendered document.
fn rendered_rule(doc: &str, number: &str) -> (String, String, String) {
    let prefix = format!("### {number} ");
    let mut lines = doc.lines().skip_while(|l| !l.starts_with(&prefix));
    let title = lines.next().unwrap()[prefix.len()..].to_string();

    let impact_line = lines.by_ref().find(|l| !l.trim().is_empty()).unwrap();
    let impact = impact_line
        .trim_start_matches("**Impact: ")
        .split([' ', '*'])
        .next()
        .unwrap()
        .to_string();

    let body: Vec<&str> = lines
        .take_while(|l| !l.starts_with("<a id=") && *l != "---")
        .collect();
    (title, impact, body.join("\n").trim_matches('\n').to_string())
}

#[test]
fn compile_renders_sections_and_rules() {
    let (dir, project) = project(&[
        ("js-set-lookup.md", JS_SET),
        ("async-parallel.md", ASYNC_PARALLEL),
    ]);

    let outcome = project.compile(None).unwrap();
    assert_eq!(outcome.output, dir.path().join("AGENTS.md"));
    assert_eq!(outcome.section_count, 2);
    assert_eq!(outcome.rule_count, 2);
    assert!(outcome.report.is_valid());

    let doc = read(&outcome.output);
    assert!(doc.starts_with("# React Best Practices\n\n**Version 1.0.0**"));
    assert!(doc.contains("## Abstract\n\nPerformance optimization guide."));
    assert!(doc.contains("## 1. Eliminating Waterfalls"));
    assert!(doc.contains("### 1.1 Promise.all() for Independent Operations"));
    assert!(doc.contains("**Impact: CRITICAL (2-10x improvement)**"));
    assert!(doc.contains("## References\n\n1. [https://react.dev](https://react.dev)"));
    assert!(doc.ends_with('\n'));
}

#[test]
fn rendered_rules_round_trip() {
    let (_dir, project) = project(&[
        ("async-parallel.md", ASYNC_PARALLEL),
        ("async-defer.md", ASYNC_DEFER),
        ("js-set-lookup.md", JS_SET),
    ]);
    let doc = read(&project.compile(None).unwrap().output);

    for (number, name, source) in [
        ("1.1", "async-defer.md", ASYNC_DEFER),
        ("1.2", "async-parallel.md", ASYNC_PARALLEL),
    ] {
        let draft = frontmatter::parse(Path::new(name), source).unwrap();
        let (title, impact, body) = rendered_rule(&doc, number);

        assert_eq!(Some(title.as_str()), draft.frontmatter.title.as_deref());
        assert_eq!(impact.parse::<ImpactTier>().unwrap().as_str(), draft.frontmatter.impact.as_deref().unwrap());
        assert_eq!(body, rendered_body(&draft.body));
    }
}

#[test]
fn compilation_is_idempotent() {
    let (dir, project) = project(&[
        ("js-set-lookup.md", JS_SET),
        ("async-parallel.md", ASYNC_PARALLEL),
    ]);

    let first = read(&project.compile(None).unwrap().output);
    let second_path = dir.path().join("second.md");
    project.compile(Some(&second_path)).unwrap();
    assert_eq!(first, read(&second_path));
}

#[test]
fn toc_anchors_match_heading_anchors() {
    let (_dir, project) = project(&[
        ("async-parallel.md", ASYNC_PARALLEL),
        ("async-defer.md", ASYNC_DEFER),
        ("js-set-lookup.md", JS_SET),
    ]);
    let doc = read(&project.compile(None).unwrap().output);

    let toc = doc
        .split("## Table of Contents")
        .nth(1)
        .and_then(|rest| rest.split("\n---\n").next())
        .unwrap();
    let targets: Vec<&str> = toc
        .match_indices("](#")
        .map(|(idx, _)| {
            let rest = &toc[idx + 3..];
            &rest[..rest.find(')').unwrap()]
        })
        .collect();

    // Two sections plus three rules.
    assert_eq!(targets.len(), 5);
    for target in &targets {
        assert_eq!(
            doc.matches(&format!("<a id=\"{target}\"></a>")).count(),
            1,
            "heading anchor for {target}"
        );
    }
    assert_eq!(doc.matches("<a id=").count(), targets.len());
    assert!(targets.contains(&anchor("Use Set for Lookups").as_str()));
}

#[test]
fn missing_closing_marker_fails_validation_and_compile() {
    let (dir, project) = project(&[
        ("async-parallel.md", ASYNC_PARALLEL),
        ("async-broken.md", "---\ntitle: Broken\nimpact: HIGH\n\nno closing marker\n"),
    ]);

    let report = project.validate().unwrap();
    let parse_errors = report.by_code("RB000");
    assert_eq!(parse_errors.len(), 1);
    assert_eq!(parse_errors[0].location.file, Path::new("async-broken.md"));
    assert!(report.has_errors());

    let err = project.compile(None).unwrap_err();
    assert!(matches!(err, RunError::Pipeline(PipelineError::Parse(_))));
    assert!(!dir.path().join("AGENTS.md").exists());
}

#[test]
fn unknown_impact_is_one_error_and_blocks_output() {
    let (dir, project) = project(&[(
        "async-parallel.md",
        &ASYNC_PARALLEL.replace("impact: CRITICAL", "impact: SUPERHIGH"),
    )]);

    let report = project.validate().unwrap();
    let errors = report.by_severity(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "RB002");
    assert!(errors[0].message.contains("SUPERHIGH"));

    let err = project.compile(None).unwrap_err();
    let refused = err.report().unwrap();
    assert_eq!(refused.by_code("RB002").len(), 1);
    assert!(!dir.path().join("AGENTS.md").exists());
}

#[test]
fn rules_are_grouped_by_ordinal_and_sorted_by_file_name() {
    let (_dir, project) = project(&[
        ("js-set-lookup.md", JS_SET),
        ("async-parallel.md", ASYNC_PARALLEL),
        ("async-defer.md", ASYNC_DEFER),
    ]);
    let outcome = project.compile(None).unwrap();
    assert_eq!(outcome.section_count, 2);
    let doc = read(&outcome.output);

    let waterfalls = doc.find("## 1. Eliminating Waterfalls").unwrap();
    let javascript = doc.find("## 7. JavaScript Performance").unwrap();
    let defer = doc.find("### 1.1 Defer Await Until Needed").unwrap();
    let parallel = doc.find("### 1.2 Promise.all() for Independent Operations").unwrap();
    let set = doc.find("### 7.1 Use Set for Lookups").unwrap();

    assert!(waterfalls < defer && defer < parallel && parallel < javascript);
    assert!(javascript < set);
    assert!(!doc.contains("## 2. "));
}

#[test]
fn warnings_do_not_block_compilation() {
    let (dir, project) = project(&[(
        "rerender-memo.md",
        "---\ntitle: Memoize Components\nimpact: MEDIUM\ntags:\n---\n\n**Incorrect:** re-renders.\n\n**Correct:** memo.\n",
    )]);

    let report = project.validate().unwrap();
    let mut codes: Vec<&str> = report.violations.iter().map(|v| v.code.as_str()).collect();
    codes.sort_unstable();
    assert_eq!(codes, vec!["RB004", "RB005"]);
    assert_eq!(report.count_by_severity(), (0, 2));

    let outcome = project.compile(None).unwrap();
    assert_eq!(outcome.report.count_by_severity(), (0, 2));
    assert!(read(&dir.path().join("AGENTS.md")).contains("### 5.1 Memoize Components"));
}

#[test]
fn reserved_files_are_skipped() {
    let (_dir, project) = project(&[
        ("async-parallel.md", ASYNC_PARALLEL),
        ("_template.md", "no frontmatter at all"),
        ("_draft-notes.md", "scratch"),
        (
            "_sections.md",
            "## 1. Eliminating Waterfalls (async)\n\n**Impact:** CRITICAL\n**Description:** Waterfalls are the top performance killer.\n",
        ),
    ]);

    let report = project.validate().unwrap();
    assert_eq!(report.files_checked, 1);
    assert!(report.is_valid());

    let doc = read(&project.compile(None).unwrap().output);
    assert!(doc.contains("**Impact: CRITICAL**\n\nWaterfalls are the top performance killer."));
}

#[test]
fn configured_section_table_replaces_builtin() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(
        dir.path().join("docs/perf-cache.md"),
        "---\ntitle: Cache It\nimpact: HIGH\ntags: cache\n---\n**Incorrect:**\n```\nslow()\n```\n**Correct:**\n```\ncached()\n```\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("meta.json"), METADATA).unwrap();

    let config = Config::parse(
        r#"
[sources]
rules_dir = "docs"
metadata = "meta.json"

[output]
document = "out/RULES.md"

[[sections]]
prefix = "perf"
name = "Performance"
ordinal = 1
impact = "HIGH"
"#,
    )
    .unwrap();
    let project = Project::new(dir.path(), config);

    let outcome = project.compile(None).unwrap();
    assert_eq!(outcome.output, dir.path().join("out/RULES.md"));
    assert!(read(&outcome.output).contains("### 1.1 Cache It"));
}

#[test]
fn extract_tests_writes_labelled_examples() {
    let (dir, project) = project(&[
        ("js-set-lookup.md", JS_SET),
        ("async-parallel.md", ASYNC_PARALLEL),
    ]);

    let outcome = project.extract_tests(None).unwrap();
    assert_eq!(outcome.output, dir.path().join("test-cases.json"));
    assert_eq!(outcome.cases.len(), 4);

    let json: serde_json::Value = serde_json::from_str(&read(&outcome.output)).unwrap();
    let first = &json[0];
    assert_eq!(first["ruleId"], "1.1");
    assert_eq!(first["ruleTitle"], "Promise.all() for Independent Operations");
    assert_eq!(first["section"], "Eliminating Waterfalls");
    assert_eq!(first["kind"], "bad");
    assert_eq!(first["language"], "typescript");
    assert_eq!(json[3]["kind"], "good");
    assert_eq!(json[3]["code"], "idSet.has(id)");
}

#[test]
fn undecodable_file_is_reported_alongside_other_files() {
    let (_dir, project) = project(&[
        ("async-parallel.md", ASYNC_PARALLEL),
        ("misc-notes.md", &JS_SET.replace("Use Set for Lookups", "Misc Notes")),
    ]);
    std::fs::write(
        project.rules_dir().join("async-broken.md"),
        b"---\ntitle: Broken \xff\xfe\nimpact: HIGH\n---\n",
    )
    .unwrap();

    let report = project.validate().unwrap();
    assert_eq!(report.files_checked, 3);
    assert_eq!(report.by_code("RB000").len(), 1);
    assert_eq!(report.by_code("RB000")[0].location.file, Path::new("async-broken.md"));
    assert_eq!(report.by_code("RB003").len(), 1);
    assert_eq!(report.by_code("RB003")[0].location.file, Path::new("misc-notes.md"));

    assert!(matches!(
        project.compile(None),
        Err(RunError::Pipeline(PipelineError::Parse(_)))
    ));
}

#[test]
fn configured_sections_file_is_not_a_rule() {
    let (dir, _) = project(&[
        ("async-parallel.md", ASYNC_PARALLEL),
        (
            "sections.md",
            "## 1. Eliminating Waterfalls (async)\n\n**Description:** Sequential awaits add latency.\n",
        ),
    ]);
    let config = Config::parse("[sources]\nsections_file = \"sections.md\"\n").unwrap();
    let project = Project::new(dir.path(), config);

    let report = project.validate().unwrap();
    assert_eq!(report.files_checked, 1);
    assert!(report.is_valid(), "{}", report.format_findings());

    let doc = read(&project.compile(None).unwrap().output);
    assert!(doc.contains("Sequential awaits add latency."));
}
