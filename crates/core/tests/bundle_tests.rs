//! Integration tests for the bundling pipeline.

use std::fs;
use std::path::PathBuf;

use luapack_core::{bundle, BundleOptions, Error};
use tempfile::TempDir;

/// Write a file relative to the temp directory, creating parents.
fn write(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// A small static tree: entry requires two modules, one of them nested.
fn static_tree(dir: &TempDir) -> PathBuf {
    write(
        dir,
        "lib/main.lua",
        "local util = require(\"util\")\nlocal box = require(\"widgets.box\")\nreturn util .. box\n",
    );
    write(dir, "lib/util.lua", "return \"U\"\n");
    write(dir, "lib/widgets/box.lua", "return \"B\"\n");
    dir.path().join("lib/main.lua")
}

#[test]
fn bundles_static_tree_without_metadata() {
    let dir = TempDir::new().unwrap();
    let entry = static_tree(&dir);

    let out = bundle(&entry, BundleOptions::default()).unwrap();

    assert!(out.contains("package.preload['__root']"));
    assert!(out.contains("package.preload['util']"));
    assert!(out.contains("package.preload['widgets.box']"));
    assert!(out.ends_with("return require('__root')\n"));
    assert!(!out.contains("Bundled by"));
}

#[test]
fn metadata_header_lists_modules() {
    let dir = TempDir::new().unwrap();
    let entry = static_tree(&dir);

    let out = bundle(
        &entry,
        BundleOptions {
            metadata: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(out.starts_with("-- Bundled by luapack v"));
    assert!(out.contains("--   util ("));
    assert!(out.contains("--   widgets.box ("));
}

#[test]
fn output_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let entry = static_tree(&dir);

    let first = bundle(&entry, BundleOptions::default()).unwrap();
    let second = bundle(&entry, BundleOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn non_literal_require_reports_and_continues() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "lib/main.lua",
        "local dyn = require(\"dyn\")\nreturn dyn\n",
    );
    write(
        &dir,
        "lib/dyn.lua",
        "local name = \"plug\"\nlocal m = require(name)\nreturn m\n",
    );

    let mut reported = Vec::new();
    let out = bundle(
        &dir.path().join("lib/main.lua"),
        BundleOptions {
            metadata: false,
            expression_handler: Some(Box::new(|module, location| {
                reported.push((module.name.clone(), location.line, location.column));
            })),
        },
    )
    .unwrap();

    assert_eq!(reported, vec![("dyn".to_string(), 2, 11)]);
    // the expression is left as-is for the runtime to deal with
    assert!(out.contains("require(name)"));
}

#[test]
fn missing_entry_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = bundle(&dir.path().join("lib/main.lua"), BundleOptions::default()).unwrap_err();
    assert!(matches!(err, Error::EntryNotFound(_)));
}

#[test]
fn unresolvable_literal_require_fails_the_bundle() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "lib/main.lua", "return require(\"ghost\")\n");

    let err = bundle(&entry, BundleOptions::default()).unwrap_err();
    match err {
        Error::ModuleNotFound { name, .. } => assert_eq!(name, "ghost"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn require_cycle_terminates_with_each_module_once() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "lib/main.lua", "return require(\"a\")\n");
    write(&dir, "lib/a.lua", "local b = require(\"b\")\nreturn \"a\"\n");
    write(&dir, "lib/b.lua", "local a = require(\"a\")\nreturn \"b\"\n");

    let out = bundle(&entry, BundleOptions::default()).unwrap();
    assert_eq!(out.matches("package.preload['a']").count(), 1);
    assert_eq!(out.matches("package.preload['b']").count(), 1);
}

#[test]
fn bundled_chunk_runs_with_shared_module_loaded_once() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "lib/main.lua",
        "local left = require(\"left\")\nlocal right = require(\"right\")\nreturn left .. right\n",
    );
    write(
        &dir,
        "lib/left.lua",
        "return \"L\" .. require(\"shared\")\n",
    );
    write(
        &dir,
        "lib/right.lua",
        "return \"R\" .. require(\"shared\")\n",
    );
    write(
        &dir,
        "lib/shared.lua",
        "loads = (loads or 0) + 1\nreturn \"S\"\n",
    );

    let out = bundle(&dir.path().join("lib/main.lua"), BundleOptions::default()).unwrap();

    let lua = mlua::Lua::new();
    let value: String = lua.load(&out).eval().unwrap();
    assert_eq!(value, "LSRS");

    let loads: i64 = lua.globals().get("loads").unwrap();
    assert_eq!(loads, 1);
}
