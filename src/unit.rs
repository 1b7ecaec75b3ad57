//! Binding unit - the main entry point for producing bindings.
//!
//! A unit collects the inputs of one generation run: interface model
//! documents written by the header analyzer, hand-built declarations, and
//! raw header text to scan for identifier declarations and `#define`
//! constants. Everything is combined during [`BindingUnit::build`].

use tracing::{debug, info};

use combridge_codegen::{GeneratedBindings, GeneratorConfig, generate};
use combridge_core::{BridgeError, ClassEntry, ConstantEntry, Guid, TypeEntry};
use combridge_parser::{DeclarationScanner, ScanConfig, ScanOutput};
use combridge_registry::{Idm, IdmBuilder, IdmDocument};

/// One generation run.
///
/// Users:
/// 1. Create a unit with `BindingUnit::new()` or `BindingUnit::with_config()`
/// 2. Add model documents with `add_document()` and headers with `add_header()`
/// 3. Build the unit with `build()`
/// 4. Read the generated source from `bindings()`
///
/// # Example
///
/// ```
/// use combridge::BindingUnit;
///
/// let mut unit = BindingUnit::new();
/// unit.add_document(r#"{
///     "types": [
///         { "entry": "class", "name": "FUnknown", "methods": [
///             { "name": "queryInterface", "return_type": "result_code", "params": [
///                 { "name": "iid", "ty": { "pointer": { "pointee": { "primitive": "int8" }, "is_const": true } } },
///                 { "name": "obj", "ty": { "pointer": { "pointee": { "pointer": { "pointee": { "primitive": "void" } } } } } } ] },
///             { "name": "addRef", "return_type": { "primitive": "uint32" } },
///             { "name": "release", "return_type": { "primitive": "uint32" } } ] },
///         { "entry": "class", "name": "IFoo", "bases": ["FUnknown"], "methods": [
///             { "name": "getValue", "return_type": { "primitive": "int32" } } ] }
///     ]
/// }"#).unwrap();
/// unit.add_header("ifoo.h", "
///     DECLARE_CLASS_IID (FUnknown, 0x00000000, 0x00000000, 0xC0000000, 0x00000046)
///     DECLARE_CLASS_IID (IFoo, 0x11111111, 0x22222222, 0x33333333, 0x44444444)
/// ");
///
/// let bindings = unit.build().unwrap();
/// assert_eq!(bindings.interface("IFoo").unwrap().slots.total(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BindingUnit {
    config: GeneratorConfig,

    /// Declarations collected so far.
    builder: IdmBuilder,

    /// Header files to scan (name, text), in insertion order.
    headers: Vec<(String, String)>,

    /// Output of the last successful build.
    bindings: Option<GeneratedBindings>,
}

impl BindingUnit {
    /// Create an empty unit with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty unit with `config`.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Add every declaration of an analyzer document.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Model`] if the text is not a valid document.
    pub fn add_document(&mut self, json: &str) -> Result<(), BridgeError> {
        let document = IdmDocument::from_json(json)?;
        debug!(
            types = document.types.len(),
            constants = document.constants.len(),
            identifiers = document.identifiers.len(),
            "document added"
        );
        for entry in document.types {
            self.add_type(entry);
        }
        for constant in document.constants {
            self.add_constant(constant);
        }
        for decl in document.identifiers {
            self.add_identifier(decl.name, decl.guid);
        }
        Ok(())
    }

    /// Add one type declaration.
    pub fn add_type(&mut self, entry: impl Into<TypeEntry>) {
        self.builder.add_type(entry);
        self.bindings = None;
    }

    /// Add a class or interface declaration.
    pub fn add_class(&mut self, class: ClassEntry) {
        self.add_type(class);
    }

    pub fn add_constant(&mut self, constant: ConstantEntry) {
        self.builder.add_constant(constant);
        self.bindings = None;
    }

    /// Attach an identifier to a declared class.
    pub fn add_identifier(&mut self, class: impl Into<String>, guid: Guid) {
        self.builder.add_identifier(class, guid);
        self.bindings = None;
    }

    /// Add header text to scan during `build()`.
    ///
    /// Adding a header under a name that is already present replaces it.
    ///
    /// # Parameters
    ///
    /// - `name`: Name for logging (e.g., "ipluginbase.h")
    /// - `source`: The header text
    pub fn add_header(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        let source = source.into();
        match self.headers.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = source,
            None => self.headers.push((name, source)),
        }
        self.bindings = None;
    }

    /// Number of headers queued for scanning.
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Check if the unit has been built since its last change.
    pub fn is_built(&self) -> bool {
        self.bindings.is_some()
    }

    /// Output of the last build, if the unit has not changed since.
    pub fn bindings(&self) -> Option<&GeneratedBindings> {
        self.bindings.as_ref()
    }

    /// Scan the headers, build the model and generate bindings.
    ///
    /// # Errors
    ///
    /// The first phase that fails stops the build:
    ///
    /// - [`BridgeError::Scan`] for malformed declarations in any header
    /// - [`BridgeError::Model`] for inconsistent declarations
    /// - [`BridgeError::Generation`] for anything the generator cannot bridge
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self) -> Result<&GeneratedBindings, BridgeError> {
        let idm = self.model()?;
        let bindings = generate(&idm, &self.config)?;
        info!(
            headers = self.headers.len(),
            interfaces = bindings.interfaces().len(),
            "unit built"
        );
        Ok(self.bindings.insert(bindings))
    }

    /// Scan the headers and build the model without generating anything.
    pub fn model(&self) -> Result<Idm, BridgeError> {
        let scanned = self.scan()?;
        let mut builder = self.builder.clone();
        for identifier in scanned.identifiers {
            builder.add_identifier(identifier.name, identifier.guid);
        }
        for constant in scanned.constants {
            builder.add_constant(constant);
        }
        Ok(builder.build()?)
    }

    fn scan(&self) -> Result<ScanOutput, BridgeError> {
        let scanner = DeclarationScanner::new(
            ScanConfig::default()
                .with_identifier_macros(self.config.identifier_macros.iter().cloned())
                .with_constants(true),
        );
        let mut output = ScanOutput::default();
        for (name, source) in &self.headers {
            let found = scanner.scan(source)?;
            debug!(
                header = name.as_str(),
                identifiers = found.identifiers.len(),
                constants = found.constants.len(),
                "header scanned"
            );
            output.extend(found)?;
        }
        Ok(output)
    }
}
