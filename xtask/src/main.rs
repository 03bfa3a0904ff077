//! Workspace automation.
//!
//! Usage:
//!   cargo xtask generate-tools           regenerate the config entity tools
//!   cargo xtask generate-tools --check   fail when the checked-in tools are stale
//!
//! The entity list lives in `api/config-entities.yaml`; one module per entity
//! plus a `mod.rs` are written to `crates/chronomcp-api/src/tools/config/`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const SPEC_PATH: &str = "api/config-entities.yaml";
const OUTPUT_DIR: &str = "crates/chronomcp-api/src/tools/config";
const HEADER: &str = "// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.\n";

/// Applied to the end of CamelCase identifiers.
const ACRONYMS: [(&str, &str); 4] = [("Json", "JSON"), ("Id", "ID"), ("Ui", "UI"), ("Slo", "SLO")];

/// Entity names whose module name differs from the entity name.
const MODULE_NAMES: [(&str, &str); 1] = [("slo", "s_l_o")];

#[derive(Debug, Deserialize)]
struct EntitySpec {
    entities: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Entity {
    name: String,
    #[serde(default)]
    plural: Option<String>,
    #[serde(default)]
    display: Option<String>,
    commands: Vec<Command>,
    #[serde(default)]
    list_params: Vec<Param>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Command {
    Read,
    List,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Param {
    name: String,
    #[serde(rename = "type")]
    kind: ParamType,
    description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum ParamType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "[]string")]
    StringArray,
}

impl ParamType {
    /// Method name shared by `ParamSchema` and `ListQuery`.
    fn method(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Bool => "boolean",
            ParamType::Int => "integer",
            ParamType::StringArray => "string_array",
        }
    }
}

impl Entity {
    fn plural(&self) -> String {
        self.plural.clone().unwrap_or_else(|| format!("{}s", self.name))
    }

    fn module(&self) -> String {
        module_name(&self.name)
    }

    fn type_name(&self) -> String {
        format!("{}Tools", camel_case(&self.name))
    }

    fn display(&self) -> String {
        self.display.clone().unwrap_or_else(|| self.name.replace('_', " "))
    }

    fn display_plural(&self) -> String {
        match &self.display {
            Some(display) => format!("{display}s"),
            None => self.plural().replace('_', " "),
        }
    }

    fn has(&self, command: Command) -> bool {
        self.commands.contains(&command)
    }
}

fn is_snake_case(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('_')
        && !name.ends_with('_')
        && !name.contains("__")
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// `classic_dashboard` -> `ClassicDashboard`, with the acronym table applied
/// to the tail: `slo` -> `SLO`, `dashboard_json` -> `DashboardJSON`.
fn camel_case(snake: &str) -> String {
    let mut out: String = snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    for (from, to) in ACRONYMS {
        if let Some(stem) = out.strip_suffix(from) {
            out = format!("{stem}{to}");
            break;
        }
    }
    out
}

fn module_name(entity: &str) -> String {
    MODULE_NAMES
        .iter()
        .find(|(name, _)| *name == entity)
        .map(|(_, module)| module.to_string())
        .unwrap_or_else(|| entity.to_string())
}

fn validate(spec: &EntitySpec) -> Result<()> {
    let mut modules = BTreeSet::new();
    for entity in &spec.entities {
        if !is_snake_case(&entity.name) {
            bail!("entity name {:?} is not snake_case", entity.name);
        }
        if !is_snake_case(&entity.plural()) {
            bail!("plural of {:?} is not snake_case", entity.name);
        }
        if entity.commands.is_empty() {
            bail!("entity {:?} has no commands", entity.name);
        }
        if !modules.insert(entity.module()) {
            bail!("entity {:?} is declared twice", entity.name);
        }
        let mut params = BTreeSet::new();
        for param in &entity.list_params {
            if !is_snake_case(&param.name) {
                bail!("{}: parameter {:?} is not snake_case", entity.name, param.name);
            }
            if param.name == "limit" || !params.insert(param.name.as_str()) {
                bail!("{}: parameter {:?} is reserved or repeated", entity.name, param.name);
            }
        }
    }
    Ok(())
}

fn string_literal(value: &str) -> String {
    format!("{value:?}")
}

fn render_entity(entity: &Entity) -> Result<String> {
    let singular = &entity.name;
    let plural = entity.plural();
    let type_name = entity.type_name();
    let display = entity.display();
    let display_plural = entity.display_plural();
    let read = entity.has(Command::Read);
    let list = entity.has(Command::List);

    let mut core_imports = Vec::new();
    if read {
        core_imports.push("params");
    }
    core_imports.extend(["RequestContext", "Result", "ToolArgs", "ToolResult"]);

    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out, "//! Read and list tools for {display_plural}")?;
    writeln!(out)?;
    writeln!(out, "use chronomcp_client::ApiClient;")?;
    writeln!(out, "use chronomcp_core::{{{}}};", core_imports.join(", "))?;
    writeln!(out)?;
    writeln!(
        out,
        "use crate::mcp::{{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt}};"
    )?;
    if list {
        writeln!(out, "use crate::tools::common::{{self, ListQuery}};")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "const COLLECTION: &str = {};",
        string_literal(&plural.replace('_', "-"))
    )?;
    if read {
        writeln!(out, "const ENTITY_KEY: &str = {};", string_literal(singular))?;
    }
    if list {
        writeln!(out, "const LIST_KEY: &str = {};", string_literal(&plural))?;
    }
    writeln!(out)?;
    writeln!(out, "pub struct {type_name} {{")?;
    writeln!(out, "    client: ApiClient,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl {type_name} {{")?;
    writeln!(out, "    pub fn new(client: ApiClient) -> Self {{")?;
    writeln!(out, "        Self {{ client }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    if read {
        writeln!(out)?;
        writeln!(out, "async fn get_{singular}(")?;
        writeln!(out, "    client: ApiClient,")?;
        writeln!(out, "    ctx: RequestContext,")?;
        writeln!(out, "    args: ToolArgs,")?;
        writeln!(out, ") -> Result<ToolResult> {{")?;
        writeln!(out, "    let slug = params::string(&args, \"slug\", true, \"\")?;")?;
        writeln!(out, "    let entity = client")?;
        writeln!(out, "        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)")?;
        writeln!(out, "        .await")?;
        writeln!(out, "        .upstream(\"get {display}\")?;")?;
        writeln!(out, "    Ok(ToolResult::from_value(entity))")?;
        writeln!(out, "}}")?;
    }

    if list {
        writeln!(out)?;
        writeln!(out, "async fn list_{plural}(")?;
        writeln!(out, "    client: ApiClient,")?;
        writeln!(out, "    ctx: RequestContext,")?;
        writeln!(out, "    args: ToolArgs,")?;
        writeln!(out, ") -> Result<ToolResult> {{")?;
        writeln!(out, "    let query = ListQuery::new()")?;
        for param in &entity.list_params {
            writeln!(
                out,
                "        .{}(&args, {})?",
                param.kind.method(),
                string_literal(&param.name)
            )?;
        }
        writeln!(out, "        .into_pairs();")?;
        writeln!(
            out,
            "    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;"
        )?;
        writeln!(out, "    let items = client")?;
        writeln!(out, "        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)")?;
        writeln!(out, "        .await")?;
        writeln!(out, "        .upstream(\"list {display_plural}\")?;")?;
        writeln!(out, "    Ok(common::listing(LIST_KEY, items))")?;
        writeln!(out, "}}")?;
    }

    writeln!(out)?;
    writeln!(out, "impl ToolGroup for {type_name} {{")?;
    writeln!(out, "    fn name(&self) -> &'static str {{")?;
    writeln!(out, "        {}", string_literal(&plural))?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    fn tools(&self) -> Vec<ToolDefinition> {{")?;
    writeln!(out, "        vec![")?;
    if read {
        writeln!(out, "            ToolDefinition::with_state(")?;
        writeln!(out, "                ToolMetadata::new(")?;
        writeln!(out, "                    \"get_{singular}\",")?;
        writeln!(
            out,
            "                    {},",
            string_literal(&format!("Get the {display} with the given slug."))
        )?;
        writeln!(out, "                )")?;
        writeln!(out, "                .with_schema(ParamSchema::new().string(")?;
        writeln!(out, "                    \"slug\",")?;
        writeln!(
            out,
            "                    {},",
            string_literal(&format!("Slug of the {display}."))
        )?;
        writeln!(out, "                    true,")?;
        writeln!(out, "                )),")?;
        writeln!(out, "                self.client.clone(),")?;
        writeln!(out, "                get_{singular},")?;
        writeln!(out, "            ),")?;
    }
    if list {
        writeln!(out, "            ToolDefinition::with_state(")?;
        writeln!(out, "                ToolMetadata::new(")?;
        writeln!(out, "                    \"list_{plural}\",")?;
        writeln!(
            out,
            "                    {},",
            string_literal(&format!("List {display_plural}, optionally filtered."))
        )?;
        writeln!(out, "                )")?;
        writeln!(out, "                .with_schema(common::limit_schema(")?;
        write!(out, "                    ParamSchema::new()")?;
        for param in &entity.list_params {
            write!(
                out,
                "\n                        .{}({}, {}, false)",
                param.kind.method(),
                string_literal(&param.name),
                string_literal(&param.description)
            )?;
        }
        writeln!(out, ",")?;
        writeln!(out, "                    common::DEFAULT_CONFIG_LIMIT,")?;
        writeln!(out, "                    common::MAX_CONFIG_LIMIT,")?;
        writeln!(out, "                )),")?;
        writeln!(out, "                self.client.clone(),")?;
        writeln!(out, "                list_{plural},")?;
        writeln!(out, "            ),")?;
    }
    writeln!(out, "        ]")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(out)
}

fn render_mod(entities: &[Entity]) -> Result<String> {
    let mut modules: Vec<String> = entities.iter().map(Entity::module).collect();
    modules.sort();

    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out, "//! Read and list tools for configuration entities")?;
    writeln!(out)?;
    for module in &modules {
        writeln!(out, "pub mod {module};")?;
    }
    writeln!(out)?;
    writeln!(out, "use chronomcp_client::ApiClient;")?;
    writeln!(out)?;
    writeln!(out, "use crate::mcp::ToolGroup;")?;
    writeln!(out)?;
    writeln!(out, "/// One group per configuration entity.")?;
    writeln!(out, "pub fn groups(client: &ApiClient) -> Vec<Box<dyn ToolGroup>> {{")?;
    writeln!(out, "    vec![")?;
    for entity in entities {
        writeln!(
            out,
            "        Box::new({}::{}::new(client.clone())),",
            entity.module(),
            entity.type_name()
        )?;
    }
    writeln!(out, "    ]")?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// File name -> contents for everything under the output directory.
fn render(spec: &EntitySpec) -> Result<BTreeMap<String, String>> {
    validate(spec)?;
    let mut files = BTreeMap::new();
    for entity in &spec.entities {
        files.insert(format!("{}.rs", entity.module()), render_entity(entity)?);
    }
    files.insert("mod.rs".to_string(), render_mod(&spec.entities)?);
    Ok(files)
}

fn load_spec(path: &Path) -> Result<EntitySpec> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Files whose contents differ from the rendering, plus generated files
/// that the entity list no longer produces.
fn stale_files(dir: &Path, files: &BTreeMap<String, String>) -> Result<Vec<String>> {
    let mut stale = Vec::new();
    for (name, contents) in files {
        let current = fs::read_to_string(dir.join(name)).unwrap_or_default();
        if &current != contents {
            stale.push(name.clone());
        }
    }
    if dir.is_dir() {
        for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".rs") && !files.contains_key(&name) {
                stale.push(name);
            }
        }
    }
    Ok(stale)
}

fn write_files(dir: &Path, files: &BTreeMap<String, String>) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for name in stale_files(dir, files)? {
        let path = dir.join(&name);
        match files.get(&name) {
            Some(contents) => {
                fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {}", path.display());
            }
            None => {
                fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
                println!("removed {}", path.display());
            }
        }
    }
    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live one level below the workspace root")
}

fn generate_tools(check: bool) -> Result<()> {
    let root = workspace_root()?;
    let spec = load_spec(&root.join(SPEC_PATH))?;
    let files = render(&spec)?;
    let dir = root.join(OUTPUT_DIR);

    if check {
        let stale = stale_files(&dir, &files)?;
        if !stale.is_empty() {
            bail!(
                "generated tools are out of date ({}); run `cargo xtask generate-tools`",
                stale.join(", ")
            );
        }
        println!("generated tools are up to date");
        return Ok(());
    }

    write_files(&dir, &files)
}

fn usage() {
    eprintln!("Usage: cargo xtask <command>");
    eprintln!("Commands:");
    eprintln!("  generate-tools [--check]  Generate config entity tools from {SPEC_PATH}");
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("generate-tools") => {
            let check = match args.get(1).map(String::as_str) {
                None => false,
                Some("--check") => true,
                Some(other) => bail!("unknown flag for generate-tools: {other}"),
            };
            generate_tools(check)
        }
        Some(other) => {
            usage();
            bail!("unknown command: {other}")
        }
        None => {
            usage();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(yaml: &str) -> EntitySpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_camel_case_applies_acronyms_to_the_tail() {
        assert_eq!(camel_case("classic_dashboard"), "ClassicDashboard");
        assert_eq!(camel_case("slo"), "SLO");
        assert_eq!(camel_case("dashboard_json"), "DashboardJSON");
        assert_eq!(camel_case("team_id"), "TeamID");
        assert_eq!(camel_case("idle_team"), "IdleTeam");
    }

    #[test]
    fn test_module_name_remap() {
        assert_eq!(module_name("slo"), "s_l_o");
        assert_eq!(module_name("monitor"), "monitor");
    }

    #[test]
    fn test_plural_and_display_defaults() {
        let spec = spec(
            r#"
entities:
  - name: notification_policy
    plural: notification_policies
    commands: [read, list]
  - name: slo
    display: SLO
    commands: [list]
"#,
        );
        let policy = &spec.entities[0];
        assert_eq!(policy.plural(), "notification_policies");
        assert_eq!(policy.display_plural(), "notification policies");
        let slo = &spec.entities[1];
        assert_eq!(slo.plural(), "slos");
        assert_eq!(slo.display_plural(), "SLOs");
        assert_eq!(slo.type_name(), "SLOTools");
    }

    #[test]
    fn test_render_entity_wires_params() {
        let spec = spec(
            r#"
entities:
  - name: notification_policy
    plural: notification_policies
    commands: [read, list]
    list_params:
      - {name: slugs, type: "[]string", description: Only these.}
      - {name: include_json, type: bool, description: With JSON.}
"#,
        );
        let out = render_entity(&spec.entities[0]).unwrap();
        assert!(out.starts_with(HEADER));
        assert!(out.contains("const COLLECTION: &str = \"notification-policies\";"));
        assert!(out.contains("const ENTITY_KEY: &str = \"notification_policy\";"));
        assert!(out.contains("async fn get_notification_policy("));
        assert!(out.contains("async fn list_notification_policies("));
        assert!(out.contains("        .string_array(&args, \"slugs\")?\n        .boolean(&args, \"include_json\")?\n"));
        assert!(out.contains(".upstream(\"list notification policies\")?;"));
        assert!(out.contains("pub struct NotificationPolicyTools {"));
    }

    #[test]
    fn test_read_only_entity_skips_list_imports() {
        let spec = spec(
            r#"
entities:
  - name: team
    commands: [read]
"#,
        );
        let out = render_entity(&spec.entities[0]).unwrap();
        assert!(out.contains("use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};"));
        assert!(!out.contains("ListQuery"));
        assert!(!out.contains("LIST_KEY"));
    }

    #[test]
    fn test_render_mod_sorts_modules_and_keeps_group_order() {
        let spec = spec(
            r#"
entities:
  - name: team
    commands: [read]
  - name: slo
    commands: [read]
"#,
        );
        let out = render_mod(&spec.entities).unwrap();
        let s_l_o = out.find("pub mod s_l_o;").unwrap();
        let team = out.find("pub mod team;").unwrap();
        assert!(s_l_o < team);
        let team_group = out.find("team::TeamTools").unwrap();
        let slo_group = out.find("s_l_o::SLOTools").unwrap();
        assert!(team_group < slo_group);
    }

    #[test]
    fn test_validation_rejects_bad_specs() {
        let duplicate = spec(
            r#"
entities:
  - {name: team, commands: [read]}
  - {name: team, commands: [list]}
"#,
        );
        assert!(render(&duplicate).is_err());

        let reserved = spec(
            r#"
entities:
  - name: team
    commands: [list]
    list_params:
      - {name: limit, type: int, description: x}
"#,
        );
        assert!(render(&reserved).is_err());

        let camel = spec("entities:\n  - {name: Team, commands: [read]}\n");
        assert!(render(&camel).is_err());

        assert!(serde_yaml::from_str::<EntitySpec>(
            "entities:\n  - {name: team, commands: [delete]}\n"
        )
        .is_err());
    }

    #[test]
    fn test_stale_files_detects_changes_and_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = BTreeMap::new();
        files.insert("mod.rs".to_string(), "a".to_string());
        files.insert("team.rs".to_string(), "b".to_string());

        fs::write(dir.path().join("mod.rs"), "a").unwrap();
        fs::write(dir.path().join("team.rs"), "old").unwrap();
        fs::write(dir.path().join("gone.rs"), "x").unwrap();

        let mut stale = stale_files(dir.path(), &files).unwrap();
        stale.sort();
        assert_eq!(stale, vec!["gone.rs", "team.rs"]);

        write_files(dir.path(), &files).unwrap();
        assert!(stale_files(dir.path(), &files).unwrap().is_empty());
        assert!(!dir.path().join("gone.rs").exists());
    }

    #[test]
    fn test_checked_in_tools_match_the_spec() {
        let root = workspace_root().unwrap();
        let spec = load_spec(&root.join(SPEC_PATH)).unwrap();
        let files = render(&spec).unwrap();
        let stale = stale_files(&root.join(OUTPUT_DIR), &files).unwrap();
        assert!(stale.is_empty(), "stale generated files: {stale:?}");
    }
}
