//! Bundling: transitive require discovery and single-chunk emission.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;
use crate::resolve;
use crate::scan::{scan_requires, RequireKind};
use crate::Result;

/// Reserved name under which the entry chunk is registered.
const ROOT_NAME: &str = "__root";

/// Callback invoked once per non-literal require. Bundling continues after
/// the call; the expression is left untouched in the output.
pub type ExpressionHandler<'a> = Box<dyn FnMut(&ModuleContext, &SourceLocation) + 'a>;

/// Options accepted by [`bundle`].
pub struct BundleOptions<'a> {
    /// Embed a module-path comment header in the output.
    pub metadata: bool,
    /// Called for each require whose argument is not a string literal.
    pub expression_handler: Option<ExpressionHandler<'a>>,
}

impl Default for BundleOptions<'_> {
    fn default() -> Self {
        Self {
            metadata: false,
            expression_handler: None,
        }
    }
}

impl fmt::Debug for BundleOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleOptions")
            .field("metadata", &self.metadata)
            .field("expression_handler", &self.expression_handler.is_some())
            .finish()
    }
}

/// The module a non-literal require was found in.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    /// Registered module name; the entry file is [`ROOT_NAME`].
    pub name: String,
    /// Path the module source was read from.
    pub path: PathBuf,
}

/// 1-based position of a require expression in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

struct Module {
    name: String,
    path: PathBuf,
    source: String,
}

/// Bundle the Lua tree rooted at `entry` into one self-contained chunk.
///
/// Literal requires are resolved against the entry file's directory (then
/// its parent) and inlined in discovery order; cycles terminate because each
/// module is inlined once. An unresolvable literal require fails the whole
/// call. Output is deterministic for an unchanged tree.
pub fn bundle(entry: &Path, mut options: BundleOptions<'_>) -> Result<String> {
    if !entry.is_file() {
        return Err(Error::EntryNotFound(entry.display().to_string()));
    }
    let entry_dir = entry.parent().unwrap_or_else(|| Path::new(""));
    let roots = resolve::search_roots(entry_dir);

    let mut modules: Vec<Module> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, PathBuf)> = VecDeque::new();

    seen.insert(ROOT_NAME.to_string());
    queue.push_back((ROOT_NAME.to_string(), entry.to_path_buf()));

    while let Some((name, path)) = queue.pop_front() {
        let source = read_module(&path)?;

        for req in scan_requires(&source) {
            match req.kind {
                RequireKind::Literal(dep) => {
                    if !seen.insert(dep.clone()) {
                        continue;
                    }
                    let dep_path = resolve::resolve(&roots, &dep).ok_or_else(|| {
                        Error::ModuleNotFound {
                            name: dep.clone(),
                            from: path.display().to_string(),
                            searched: resolve::candidates(&roots, &dep)
                                .iter()
                                .map(|p| p.display().to_string())
                                .collect::<Vec<_>>()
                                .join(", "),
                        }
                    })?;
                    debug!(module = %dep, path = %dep_path.display(), "resolved require");
                    queue.push_back((dep, dep_path));
                }
                RequireKind::NonLiteral => {
                    if let Some(handler) = options.expression_handler.as_mut() {
                        handler(
                            &ModuleContext {
                                name: name.clone(),
                                path: path.clone(),
                            },
                            &SourceLocation {
                                line: req.line,
                                column: req.column,
                            },
                        );
                    }
                }
            }
        }

        modules.push(Module { name, path, source });
    }

    debug!(modules = modules.len(), "bundle assembled");
    Ok(emit(&modules, options.metadata))
}

fn read_module(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::ModuleRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Render registered modules as `package.preload` loaders followed by a
/// `require` of the root, so plain Lua `require` serves the inlined tree.
fn emit(modules: &[Module], metadata: bool) -> String {
    let mut out = String::new();
    if metadata {
        out.push_str(&format!(
            "-- Bundled by luapack v{}\n-- Modules:\n",
            env!("CARGO_PKG_VERSION")
        ));
        for module in modules {
            out.push_str(&format!(
                "--   {} ({})\n",
                module.name,
                module.path.display()
            ));
        }
        out.push('\n');
    }
    for module in modules {
        out.push_str(&format!(
            "package.preload['{}'] = function(...)\n{}\nend\n",
            module.name,
            module.source.trim_end()
        ));
    }
    out.push_str(&format!("return require('{ROOT_NAME}')\n"));
    out
}
