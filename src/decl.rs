//! JSON declaration documents, used by the CLI and the fixture runner.
//!
//! ```json
//! {
//!   "family": "bounded",
//!   "signature": {"name": "f", "params": ["x", {"name": "y", "default": 6}, "*args", "**kwargs"]},
//!   "positional": [[1, 3], [4, 6]],
//!   "named": {}
//! }
//! ```
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as Json;

use crate::binder::ArgumentBinder;
use crate::config::Settings;
use crate::error::Result;
use crate::signature::{Param, ParamKind, Signature};
use crate::spec::{BoundsFamily, Family, Spec, SpecTable, TypeFamily};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyName {
    Typed,
    Bounded,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    pub family: FamilyName,
    pub signature: SignatureDoc,
    #[serde(default)]
    pub positional: Vec<Json>,
    #[serde(default)]
    pub named: IndexMap<String, Json>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureDoc {
    pub name: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamDoc>,
}

/// `"x"`, `"*args"`, `"**kwargs"`, or the long form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParamDoc {
    Short(String),
    Long {
        name: String,
        #[serde(default)]
        kind: Option<ParamKind>,
        #[serde(default)]
        default: Option<Json>,
    },
}

impl SignatureDoc {
    pub fn to_signature(&self) -> Result<Signature> {
        let mut sig = Signature::new(self.name.as_str());
        if let Some(module) = &self.module {
            sig = sig.module(module.as_str());
        }
        for param in &self.params {
            sig = match param {
                ParamDoc::Short(name) => match name.strip_prefix("**") {
                    Some(rest) => sig.var_kwargs(rest),
                    None => match name.strip_prefix('*') {
                        Some(rest) => sig.var_args(rest),
                        None => sig.param(name.as_str()),
                    },
                },
                ParamDoc::Long { name, kind, default } => {
                    let kind = kind.unwrap_or(ParamKind::Positional);
                    let default = default.as_ref().map(Value::from_json).transpose()?;
                    sig.params.push(Param { name: name.clone(), kind, default });
                    sig
                }
            };
        }
        Ok(sig)
    }
}

impl Declaration {
    pub fn from_json_str(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        crate::path_de::from_file_with_path(path)
    }

    pub fn table<F: Family>(&self) -> Result<SpecTable> {
        let positional = self.positional.iter().map(Spec::from_json::<F>).collect::<Result<Vec<_>>>()?;
        let mut table = SpecTable::new(positional);
        for (name, json) in &self.named {
            table = table.named(name.as_str(), Spec::from_json::<F>(json)?);
        }
        Ok(table)
    }

    /// Parse, merge and compile the declaration.
    pub fn binder(&self, settings: &Settings) -> Result<ArgumentBinder> {
        let signature = self.signature.to_signature()?;
        let binder = match self.family {
            FamilyName::Typed => ArgumentBinder::new::<TypeFamily>(&self.table::<TypeFamily>()?, &signature, settings)?,
            FamilyName::Bounded => {
                ArgumentBinder::new::<BoundsFamily>(&self.table::<BoundsFamily>()?, &signature, settings)?
            }
        };
        Ok(binder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Args;
    use crate::error::{CheckErrorKind, Error};

    const INTERVAL: &str = r#"{
        "family": "bounded",
        "signature": {"name": "f", "module": "demo", "params": ["x", {"name": "y", "default": 6}, "*args", "**kwargs"]},
        "positional": [[1, 3], [4, 6]]
    }"#;

    #[test]
    fn signature_shorthands() {
        let decl = Declaration::from_json_str(INTERVAL).unwrap();
        let sig = decl.signature.to_signature().unwrap();
        assert_eq!(sig.declared_names(), vec!["x", "y"]);
        assert_eq!(sig.var_args_name(), Some("args"));
        assert_eq!(sig.var_kwargs_name(), Some("kwargs"));
        assert_eq!(sig.params[1].default, Some(Value::Int(6)));
    }

    #[test]
    fn interval_declaration_checks_calls() {
        let binder = Declaration::from_json_str(INTERVAL).unwrap().binder(&Settings::default()).unwrap();
        let ok = Args::new([1, 5, 3, 4].map(Value::Int)).with_kwarg("z", 2);
        assert!(binder.enforce(&ok).is_ok());
        let err = binder.enforce(&Args::new([Value::Int(2), Value::Int(7)])).unwrap_err();
        assert_eq!(err.cause.kind(), CheckErrorKind::OutOfBounds);
    }

    #[test]
    fn decode_errors_name_the_path() {
        let err = Declaration::from_json_str(r#"{"family": "fuzzy", "signature": {"name": "f"}}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().contains("family"), "{err}");
    }

    #[test]
    fn malformed_specs_surface_as_spec_errors() {
        let src = r#"{"family": "typed", "signature": {"name": "f", "params": ["x"]}, "named": {"x": {"list": ["int", "...", "..."]}}}"#;
        let err = Declaration::from_json_str(src).unwrap().binder(&Settings::default()).unwrap_err();
        assert!(matches!(err, Error::Spec(_)), "{err}");
    }
}
