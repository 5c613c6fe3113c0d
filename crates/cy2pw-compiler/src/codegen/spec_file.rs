//! Spec file assembly: `describe`/`it`/hooks to `test.describe`/`test`/`test.*` hooks.

use std::path::Path;

use super::project::import_specifier;
use super::registry::{CommandRegistry, HelperUse};
use super::support::{HELPERS_FILE, PAGE_OBJECT_FILE};
use crate::custom::PAGE_OBJECT_CLASS;
use crate::diagnostic::Span;
use crate::ir::{HookKind, Modifier, SpecFile, Statement, TestNode, Value};
use crate::literal::{format_value, one_line};
use crate::mapping::lookup_command;
use crate::translate::{translate, PLAYWRIGHT_IMPORT};

const INDENT: &str = "  ";

/// A generated spec file plus the numbers that go into its report entry.
#[derive(Debug, Clone)]
pub struct GeneratedSpec {
    pub code: String,
    pub commands: usize,
    pub converted: usize,
    pub todos: usize,
    pub diagnostics: Vec<String>,
}

/// Generates the Playwright spec for `spec`, to be written at `output` (relative to the
/// output directory).
pub fn generate_spec(spec: &SpecFile, output: &Path, registry: &CommandRegistry) -> GeneratedSpec {
    let mut writer = SpecWriter::new(registry);
    writer.nodes(&spec.nodes, 0);

    let mut imports = vec![PLAYWRIGHT_IMPORT.to_string()];
    for import in writer.imports.drain(..) {
        if !imports.contains(&import) {
            imports.push(import);
        }
    }
    if !writer.helpers.is_empty() {
        let target = Path::new(HELPERS_FILE).with_extension("");
        imports.push(format!(
            "import {{ {} }} from '{}';",
            writer.helpers.join(", "),
            import_specifier(output, &target)
        ));
    }
    if writer.page_object {
        let target = Path::new(PAGE_OBJECT_FILE).with_extension("");
        imports.push(format!(
            "import {{ {PAGE_OBJECT_CLASS} }} from '{}';",
            import_specifier(output, &target)
        ));
    }

    let mut code = imports.join("\n");
    code.push_str("\n\n");
    code.push_str(writer.out.trim_start_matches('\n'));
    let todos = code.lines().filter(|l| l.trim_start().starts_with("// TODO")).count();

    GeneratedSpec {
        code,
        commands: writer.commands,
        converted: writer.converted,
        todos,
        diagnostics: writer.diagnostics,
    }
}

struct SpecWriter<'a> {
    registry: &'a CommandRegistry,
    out: String,
    imports: Vec<String>,
    helpers: Vec<String>,
    page_object: bool,
    diagnostics: Vec<String>,
    commands: usize,
    converted: usize,
}

impl<'a> SpecWriter<'a> {
    fn new(registry: &'a CommandRegistry) -> Self {
        Self {
            registry,
            out: String::new(),
            imports: Vec::new(),
            helpers: Vec::new(),
            page_object: false,
            diagnostics: Vec::new(),
            commands: 0,
            converted: 0,
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Writes possibly multi-line code, keeping its own relative indentation.
    fn block(&mut self, depth: usize, code: &str) {
        for line in code.lines() {
            self.line(depth, line);
        }
    }

    fn diagnose(&mut self, span: &Span, message: impl AsRef<str>) {
        self.diagnostics.push(format!("line {}: {}", span.line(), message.as_ref()));
    }

    fn nodes(&mut self, nodes: &[TestNode], depth: usize) {
        let mut previous_block = false;
        for node in nodes {
            let is_block = !matches!(node, TestNode::Statement(_));
            if is_block && previous_block {
                self.line(0, "");
            } else if is_block && !self.out.is_empty() && depth == 0 {
                self.line(0, "");
            }
            self.node(node, depth);
            previous_block = is_block;
        }
    }

    fn node(&mut self, node: &TestNode, depth: usize) {
        match node {
            TestNode::Suite {
                title,
                modifier,
                children,
                ..
            } => {
                self.line(depth, &format!("test.describe{}({}, () => {{", modifier_suffix(*modifier), title_of(title)));
                self.nodes(children, depth + 1);
                self.line(depth, "});");
            }
            TestNode::Test {
                title, modifier, body, ..
            } => {
                self.line(
                    depth,
                    &format!("test{}({}, async ({{ page }}) => {{", modifier_suffix(*modifier), title_of(title)),
                );
                self.statements(body, depth + 1);
                self.line(depth, "});");
            }
            TestNode::Hook { kind, body, span } => self.hook(*kind, body, span, depth),
            TestNode::Statement(statement) => self.statement(statement, depth, true),
        }
    }

    fn hook(&mut self, kind: HookKind, body: &[Statement], span: &Span, depth: usize) {
        match kind {
            HookKind::BeforeEach | HookKind::AfterEach => {
                let name = if kind == HookKind::BeforeEach { "beforeEach" } else { "afterEach" };
                self.line(depth, &format!("test.{name}(async ({{ page }}) => {{"));
                self.statements(body, depth + 1);
                self.line(depth, "});");
            }
            HookKind::Before | HookKind::After => {
                let (source, name) = if kind == HookKind::Before {
                    ("before", "beforeAll")
                } else {
                    ("after", "afterAll")
                };
                self.diagnose(
                    span,
                    format!("{source}() became test.{name} with its own page; browser state does not carry over to tests"),
                );
                self.line(depth, &format!("test.{name}(async ({{ browser }}) => {{"));
                self.line(depth + 1, "const page = await browser.newPage();");
                self.statements(body, depth + 1);
                self.line(depth + 1, "await page.close();");
                self.line(depth, "});");
            }
        }
    }

    fn statements(&mut self, body: &[Statement], depth: usize) {
        for statement in body {
            self.statement(statement, depth, false);
        }
    }

    fn statement(&mut self, statement: &Statement, depth: usize, top_level: bool) {
        match statement {
            Statement::Raw { text, span } => {
                if text.contains("cy.") {
                    self.diagnose(span, "Cypress code nested in a callback or block was left as written");
                    self.line(depth, "// TODO: Convert the nested Cypress calls below");
                }
                self.block(depth, text);
            }
            Statement::Command { command, span } => {
                self.commands += 1;
                if top_level {
                    self.diagnose(span, format!("{} runs outside of a test", one_line(&command.source_form())));
                    self.line(depth, &format!("// TODO: Move into a test: {}", one_line(&command.source_form())));
                    return;
                }

                // Built-in commands win over `Cypress.Commands.overwrite`.
                let custom = match lookup_command(&command.name) {
                    Some(_) => None,
                    None => self.registry.lower(command),
                };
                if let Some(lowered) = custom {
                    if lowered.converted {
                        self.converted += 1;
                    }
                    match lowered.helper {
                        Some(HelperUse::Function(name)) if !self.helpers.contains(&name) => self.helpers.push(name),
                        Some(HelperUse::PageObject) => self.page_object = true,
                        _ => {}
                    }
                    self.imports.extend(lowered.imports);
                    for diagnostic in &lowered.diagnostics {
                        self.diagnose(span, diagnostic);
                    }
                    self.block(depth, &terminate(&lowered.code));
                    return;
                }

                let result = translate(command);
                if !result.has_todo() {
                    self.converted += 1;
                }
                self.imports.extend(result.imports.into_iter().filter(|i| i != PLAYWRIGHT_IMPORT));
                for diagnostic in &result.diagnostics {
                    self.diagnose(span, diagnostic);
                }
                if !result.code.is_empty() {
                    self.block(depth, &terminate(&result.code));
                }
            }
        }
    }
}

/// Adds the trailing `;` unless the code already ends with one or with a comment.
fn terminate(code: &str) -> String {
    let last = code.lines().last().unwrap_or("").trim();
    if last.is_empty() || last.ends_with(';') || last.starts_with("//") {
        code.to_string()
    } else {
        format!("{code};")
    }
}

fn modifier_suffix(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::None => "",
        Modifier::Only => ".only",
        Modifier::Skip => ".skip",
    }
}

fn title_of(title: &Value) -> String {
    format_value(title)
}
