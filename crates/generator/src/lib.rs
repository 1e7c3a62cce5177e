//! Example stub generation for gRPC methods
//!
//! This crate turns a descriptor model into one stub per RPC method. Each
//! stub shows an example input as a comment and returns an example
//! output, shaped by the method's streaming mode:
//!
//! 1. [`synthesizer`] builds example value trees for request and response
//! 2. [`shape`] derives the input/output envelopes from the streaming flags
//! 3. [`render`] lays both out through the language template
//!
//! Methods are independent of each other and are generated in parallel.
//! A failing method is reported in its [`MethodOutcome`] without
//! affecting the others.

pub mod path;
pub mod render;
pub mod shape;
pub mod synthesizer;
mod target;
mod templates;
pub mod value;
pub mod well_known;

pub use path::ExpansionPath;
pub use render::Renderer;
pub use shape::{resolve, CallShape, InputEnvelope, OutputEnvelope, RpcKind};
pub use synthesizer::{synthesize, Synthesizer};
pub use target::matches_target;
pub use value::{FieldAnnotation, FieldType, Literal, MessageEntry, SynthesizedValue};

use rayon::prelude::*;
use rpc_bones_common::{
    GeneratorError, MethodDescriptor, RenderOptions, Result, SchemaModel, TypeRef,
};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Rendered stub for one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodStub {
    /// `pkg.Service.Method`
    pub full_name: String,
    pub kind: RpcKind,
    /// Output file name, `pkg.Service.Method.<ext>`
    pub file_name: String,
    /// Stub source, without a trailing newline
    pub text: String,
}

/// Result of generating one method
#[derive(Debug)]
pub struct MethodOutcome {
    pub method: String,
    pub result: Result<MethodStub>,
}

/// What happened when writing a stub to a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Created(PathBuf),
    /// The file existed and was kept because `force` was not set
    Skipped(PathBuf),
}

/// Stub generator
///
/// Holds an immutable descriptor model and options; every method is
/// synthesized and rendered independently.
pub struct StubGenerator {
    model: SchemaModel,
    options: RenderOptions,
    renderer: Renderer,
}

impl StubGenerator {
    /// Create a generator, rejecting invalid options up front
    pub fn new(model: SchemaModel, options: RenderOptions) -> Result<Self> {
        options.validate()?;
        let renderer = Renderer::new()?;
        Ok(Self {
            model,
            options,
            renderer,
        })
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Synthesize and render the stub for a single method
    pub fn generate_method(&self, method: &MethodDescriptor) -> Result<MethodStub> {
        let shape = shape::resolve(method);

        let (request, response) = if self.options.minimal {
            (None, None)
        } else {
            let synth = Synthesizer::new(&self.model, &self.options)?;
            let root = ExpansionPath::root();
            let request = synth.synthesize(&TypeRef::message(&method.input_type), &root)?;
            let response = synth.synthesize(&TypeRef::message(&method.output_type), &root)?;
            (Some(request), Some(response))
        };

        let text = self.renderer.render(
            method,
            &shape,
            request.as_ref(),
            response.as_ref(),
            &self.options,
        )?;

        Ok(MethodStub {
            full_name: method.full_name.clone(),
            kind: shape.kind,
            file_name: format!("{}{}", method.full_name, self.options.lang.extension()),
            text,
        })
    }

    /// Generate every method selected by `targets`, in schema order
    pub fn generate(&self, targets: &[String]) -> Vec<MethodOutcome> {
        let selected: Vec<&MethodDescriptor> = self
            .model
            .methods()
            .filter(|(service, method)| matches_target(service, method, targets))
            .map(|(_, method)| method)
            .collect();

        tracing::debug!(methods = selected.len(), "generating method stubs");

        selected
            .par_iter()
            .map(|method| {
                tracing::debug!(method = %method.full_name, "writing bones");
                let result = self.generate_method(method);
                if let Err(e) = &result {
                    tracing::warn!(method = %method.full_name, error = %e, "method failed");
                }
                MethodOutcome {
                    method: method.full_name.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// Generate stubs for all selected methods (convenience function)
pub fn generate_stubs(
    model: SchemaModel,
    options: RenderOptions,
    targets: &[String],
) -> Result<Vec<MethodOutcome>> {
    let generator = StubGenerator::new(model, options)?;
    Ok(generator.generate(targets))
}

/// Write a stub into `dir` as `<file_name>`
///
/// Existing files are left alone unless `force` is set.
pub fn write_stub(dir: &Path, stub: &MethodStub, force: bool) -> Result<WriteStatus> {
    let path = dir.join(&stub.file_name);

    let mut open = OpenOptions::new();
    open.write(true);
    if force {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }

    let mut file = match open.open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists && !force => {
            tracing::debug!(path = %path.display(), "skip existing file, use --force to override");
            return Ok(WriteStatus::Skipped(path));
        }
        Err(e) => {
            return Err(GeneratorError::Generation(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    writeln!(file, "{}", stub.text)?;
    tracing::debug!(path = %path.display(), "created file");
    Ok(WriteStatus::Created(path))
}
