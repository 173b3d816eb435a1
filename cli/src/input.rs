#![deny(missing_docs)]

//! # Document Input
//!
//! Shared arguments every command takes: the document path and the
//! normalization options. Options come from an optional config file, then
//! flags (or their `OAS_GUIDE_*` environment variables) override it.

use crate::error::{CliError, CliResult};
use oas_guide_core::{
    normalize_document, parse_document, ApiSpecModel, DocumentPointerResolver, MergePolicy,
    NormalizeOptions, ResolutionMode,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Merge policy for conflicting `allOf` members.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicyArg {
    /// The later member wins.
    LastWins,
    /// The first declared value is kept.
    FirstWins,
    /// Conflicts fail the run (notes only in best-effort mode).
    Reject,
}

impl From<MergePolicyArg> for MergePolicy {
    fn from(arg: MergePolicyArg) -> Self {
        match arg {
            MergePolicyArg::LastWins => MergePolicy::LastWins,
            MergePolicyArg::FirstWins => MergePolicy::FirstWins,
            MergePolicyArg::Reject => MergePolicy::Reject,
        }
    }
}

/// Document and normalization arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the OpenAPI 3.x document (JSON or YAML).
    pub spec: PathBuf,

    /// YAML or JSON file with normalization options.
    #[clap(long, env = "OAS_GUIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Downgrade unresolved references and conflicts to diagnostics.
    #[clap(long, env = "OAS_GUIDE_BEST_EFFORT")]
    pub best_effort: bool,

    /// How conflicting `allOf` members are settled.
    #[clap(long, value_enum, env = "OAS_GUIDE_MERGE_POLICY")]
    pub merge_policy: Option<MergePolicyArg>,

    /// Schema nesting / reference depth cap.
    #[clap(long, env = "OAS_GUIDE_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Base URL used when the document declares no servers.
    #[clap(long, env = "OAS_GUIDE_SERVER")]
    pub server: Option<String>,

    /// URI the document was retrieved from; `$ref`s qualified with it are local.
    /// Defaults to the document's `$self`.
    #[clap(long, env = "OAS_GUIDE_BASE_URI")]
    pub base_uri: Option<String>,
}

impl InputArgs {
    /// Effective options: config file first, flags on top.
    pub fn options(&self) -> CliResult<NormalizeOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = read(path)?;
                serde_yaml::from_str::<NormalizeOptions>(&text)?
            }
            None => NormalizeOptions::default(),
        };
        if self.best_effort {
            options.mode = ResolutionMode::BestEffort;
        }
        if let Some(policy) = self.merge_policy {
            options.all_of_conflicts = policy.into();
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        if let Some(server) = &self.server {
            options.default_server_url = server.clone();
        }
        Ok(options)
    }

    /// Reads, parses and normalizes the document.
    pub fn load_model(&self) -> CliResult<ApiSpecModel> {
        let options = self.options()?;
        let text = read(&self.spec)?;
        let raw = parse_document(&text)?;
        let pointers = match &self.base_uri {
            Some(uri) => DocumentPointerResolver::with_base_uri(&raw, uri),
            None => DocumentPointerResolver::new(&raw),
        };
        let model = normalize_document(&raw, &pointers, &options)?;

        for diagnostic in &model.diagnostics {
            tracing::warn!("{}", diagnostic);
        }
        tracing::info!(spec = %self.spec.display(), endpoints = model.endpoints.len(), "Loaded");
        Ok(model)
    }
}

fn read(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(spec: PathBuf) -> InputArgs {
        InputArgs {
            spec,
            config: None,
            best_effort: false,
            merge_policy: None,
            max_depth: None,
            server: None,
            base_uri: None,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("options.yaml");
        fs::write(&config, "mode: best-effort\nallOfConflicts: reject\nmaxDepth: 10\n").unwrap();

        let mut input = args(dir.path().join("openapi.yaml"));
        input.config = Some(config);
        input.max_depth = Some(20);
        input.server = Some("http://localhost:8080".into());

        let options = input.options().unwrap();
        assert_eq!(options.mode, ResolutionMode::BestEffort);
        assert_eq!(options.all_of_conflicts, MergePolicy::Reject);
        assert_eq!(options.max_depth, 20);
        assert_eq!(options.default_server_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_document_names_the_path() {
        let dir = tempdir().unwrap();
        let input = args(dir.path().join("missing.yaml"));
        let err = input.load_model().unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_load_model() {
        let dir = tempdir().unwrap();
        let spec = dir.path().join("openapi.json");
        fs::write(
            &spec,
            r#"{"openapi": "3.0.0", "info": {"title": "T", "version": "1"}, "paths": {"/ping": {"get": {"responses": {}}}}}"#,
        )
        .unwrap();
        let model = args(spec).load_model().unwrap();
        assert_eq!(model.endpoints.len(), 1);
    }

    #[test]
    fn test_base_uri_makes_qualified_refs_local() {
        let dir = tempdir().unwrap();
        let spec = dir.path().join("openapi.yaml");
        fs::write(
            &spec,
            r#"
openapi: 3.1.0
info: {title: T, version: '1'}
components:
  schemas:
    Pong: {type: object, properties: {ok: {type: boolean}}}
paths:
  /ping:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema: {$ref: 'https://api.test/openapi.yaml#/components/schemas/Pong'}
"#,
        )
        .unwrap();
        assert!(args(spec.clone()).load_model().is_err());

        let mut input = args(spec);
        input.base_uri = Some("https://api.test/openapi.yaml".into());
        let model = input.load_model().unwrap();
        let schema = model.endpoints[0].responses[0].schema.as_ref().unwrap();
        assert_eq!(schema.resolved_type, "Pong");
    }
}
