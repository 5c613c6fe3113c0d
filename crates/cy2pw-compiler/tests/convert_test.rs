//! End-to-end conversion of a small Cypress project on disk.

use std::fs;
use std::path::Path;

use cy2pw_compiler::{ConversionStrategy, Converter, ConverterConfig, ConverterError, REPORT_FILE};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const LOGIN_SPEC: &str = r#"/// <reference types="cypress" />

describe('Login', () => {
  beforeEach(() => {
    cy.visit('/login');
  });

  it('signs in', () => {
    cy.login('user@example.com', 'secret');
    cy.get('[data-testid="greeting"]').should('contain.text', 'Welcome');
    cy.url().should('include', '/dashboard');
  });

  it('fills the profile', () => {
    cy.fillProfile('Ada');
    cy.task('db:seed');
  });
});
"#;

const COMMANDS: &str = r#"Cypress.Commands.add('login', (email, password) => {
  cy.visit('/login');
  cy.get('#email').type(email);
  cy.get('#password').type(password);
  cy.get('button[type="submit"]').click();
});

Cypress.Commands.add('fillProfile', (name) => {
  cy.get('#first-name').type(name);
  cy.get('#last-name').clear();
  cy.get('[data-testid="save"]').click();
});
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "cypress/e2e/auth/login.cy.js", LOGIN_SPEC);
    write(dir.path(), "cypress/support/commands.js", COMMANDS);
    write(dir.path(), "cypress/fixtures/users.json", "[]");
    write(
        dir.path(),
        "cypress.config.js",
        "module.exports = { e2e: { baseUrl: 'http://localhost:4000' } };\n",
    );
    dir
}

fn config(dir: &TempDir) -> ConverterConfig {
    ConverterConfig {
        source_dir: dir.path().join("cypress"),
        out_dir: dir.path().join("playwright"),
        ..ConverterConfig::default()
    }
}

#[test]
fn converts_project() {
    let dir = project();
    let result = Converter::new(config(&dir)).convert().unwrap();
    assert_eq!(result.spec_files, 1);

    let out = dir.path().join("playwright");
    let spec = fs::read_to_string(out.join("auth/login.spec.ts")).unwrap();
    assert!(spec.starts_with("import { test, expect } from '@playwright/test';\n"));
    assert!(spec.contains("import { login } from '../support/helpers';"));
    assert!(spec.contains("import { CustomCommands } from '../support/custom-commands';"));
    assert!(spec.contains("test.describe('Login', () => {"));
    assert!(spec.contains("    await login(page, 'user@example.com', 'secret');\n"));
    assert!(spec.contains("    await expect(page.getByTestId('greeting')).toContainText('Welcome');\n"));
    assert!(spec.contains("    await new CustomCommands(page).fillProfile('Ada');\n"));
    assert!(spec.contains("    // TODO: Convert cy.task('db:seed')\n"));
    assert!(!spec.contains("reference types"));

    let helpers = fs::read_to_string(out.join("support/helpers.ts")).unwrap();
    assert!(helpers.contains("export async function login(page: Page, email: any, password: any): Promise<void> {"));
    let page_objects = fs::read_to_string(out.join("support/custom-commands.ts")).unwrap();
    assert!(page_objects.contains("export class CustomCommands {"));
    assert!(page_objects.contains("await this.page.locator('#first-name').fill(name);"));

    let config = fs::read_to_string(out.join("playwright.config.ts")).unwrap();
    assert!(config.contains("baseURL: 'http://localhost:4000'"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(REPORT_FILE)).unwrap()).unwrap();
    assert_eq!(report["totals"]["commands"], 6);
    assert_eq!(report["totals"]["todos"], 1);
    assert_eq!(report["files"][0]["output"], "auth/login.spec.ts");
    assert_eq!(report["customCommands"][0]["strategy"], "utility");
    assert_eq!(report["customCommands"][1]["strategy"], "pageObject");
}

#[test]
fn check_writes_nothing() {
    let dir = project();
    let report = Converter::new(config(&dir)).check().unwrap();
    assert_eq!(report.totals.files, 1);
    assert_eq!(report.custom_commands[1].strategy, ConversionStrategy::PageObject);
    assert!(!dir.path().join("playwright").exists());
}

#[test]
fn report_can_be_disabled() {
    let dir = project();
    let config = ConverterConfig {
        write_report: false,
        ..config(&dir)
    };
    Converter::new(config).convert().unwrap();
    assert!(!dir.path().join("playwright").join(REPORT_FILE).exists());
}

#[test]
fn duplicate_custom_commands_are_rejected() {
    let dir = project();
    write(
        dir.path(),
        "cypress/support/more-commands.js",
        "Cypress.Commands.add('login', () => { cy.visit('/'); });\n",
    );
    assert!(matches!(
        Converter::new(config(&dir)).convert(),
        Err(ConverterError::DuplicateCustomCommand { .. })
    ));
}

#[test]
fn empty_project_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("cypress")).unwrap();
    assert!(matches!(
        Converter::new(config(&dir)).convert(),
        Err(ConverterError::NoSpecFiles { .. })
    ));
}

#[test]
fn converts_single_source() {
    let converted = Converter::convert_source(
        "it('searches', () => {\n  cy.get('input[name=q]').type('rust{enter}');\n});\n",
        Path::new("search.cy.ts"),
    )
    .unwrap();
    assert_eq!(
        converted.code,
        "import { test, expect } from '@playwright/test';\n\n\
         test('searches', async ({ page }) => {\n\
         \x20 await page.locator('input[name=q]').fill('rust');\n\
         \x20 await page.locator('input[name=q]').press('Enter');\n\
         });\n"
    );
    assert_eq!(converted.report.output, "search.spec.ts");
    assert_eq!(converted.report.todos, 0);
}
