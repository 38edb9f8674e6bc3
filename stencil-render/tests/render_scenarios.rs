//! Rendering scenarios through the public API: resolver output feeding the
//! substitution engine, and template loading from a source tree on disk.

use std::fs;

use tempfile::TempDir;

use stencil_core::{resolver, types::IdentitySection, types::Profile, PlaceholderMap};
use stencil_render::{load_template, render, RenderError};

fn resolved_map(project_name: &str) -> PlaceholderMap {
    let profile = Profile {
        identity: IdentitySection {
            project_name: Some(project_name.to_string()),
            ..IdentitySection::default()
        },
        ..Profile::default()
    };
    resolver::resolve(&profile).expect("resolve")
}

#[test]
fn resolver_defaults_flow_through_to_rendered_text() {
    let map = resolved_map("copnow");
    let r = render(
        "project {{PROJECT_NAME}} tests with `{{TEST_COMMAND}}` on {{DEFAULT_BRANCH}}",
        &map,
    );
    assert_eq!(
        r.text,
        "project copnow tests with `make test` on main"
    );
    assert!(r.is_fully_resolved());
}

#[test]
fn partial_profile_renders_with_markers_intact() {
    let map = resolved_map("copnow");
    let r = render("branch={{DEFAULT_BRANCH}}, mode={{MODE}}", &map);
    assert_eq!(r.text, "branch=main, mode={{MODE}}");
    assert_eq!(r.unresolved.len(), 1);
    assert!(r.unresolved.contains("MODE"));
}

#[test]
fn template_loaded_from_disk_renders_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("review.sh.tmpl");
    fs::write(
        &path,
        "#!/bin/sh\n# generated for {{PROJECT_NAME}}\nexec {{LINT_COMMAND}} \"$@\"\n",
    )
    .unwrap();

    let template = load_template(&path).expect("load");
    let r = render(&template, &resolved_map("copnow"));
    assert_eq!(
        r.text,
        "#!/bin/sh\n# generated for copnow\nexec make lint \"$@\"\n"
    );
}

#[test]
fn missing_template_error_names_the_path() {
    let dir = TempDir::new().unwrap();
    let err = load_template(&dir.path().join("absent.tmpl")).unwrap_err();
    assert!(matches!(err, RenderError::TemplateNotFound { .. }));
    assert!(err.to_string().contains("absent.tmpl"));
}

#[test]
fn rendering_is_stable_across_repeated_calls() {
    let map = resolved_map("copnow");
    let template = "{{PROJECT_NAME}} -> {{REMOTE_NAME}}/{{DEFAULT_BRANCH}}";
    let first = render(template, &map);
    let second = render(template, &map);
    assert_eq!(first, second);
    assert_eq!(first.text, "copnow -> origin/main");
}
