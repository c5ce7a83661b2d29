//! Registration of a container's fields and their descriptors.
//!
//! A container implements [`Options`] and lists its fields in
//! [`Options::declare`]. Each field is reached through a plain accessor
//! function, so no runtime type inspection is needed.

use crate::descriptor::{ArgumentDescriptor, OptionDescriptor};
use crate::error::DefinitionError;
use crate::field::{FieldType, FieldValue};

/// A struct whose fields can be filled from the command line.
///
/// `Default` supplies the fresh instance the one-shot parse functions fill.
pub trait Options: Default + 'static {
    fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError>;
}

/// Type-erased path from a container to one of its fields.
pub(crate) type Accessor<T> = Box<dyn for<'a> Fn(&'a mut T) -> &'a mut (dyn FieldValue + 'a)>;

fn erase<T, F>(f: F) -> Accessor<T>
where
    F: for<'a> Fn(&'a mut T) -> &'a mut (dyn FieldValue + 'a) + 'static,
{
    Box::new(f)
}

/// One annotation attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Option(OptionDescriptor),
    Argument(ArgumentDescriptor),
    CatchAll,
}

/// A declared field and everything attached to it.
pub struct FieldDecl<T> {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) description: Option<String>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) access: Accessor<T>,
}

impl<T> FieldDecl<T> {
    /// Bind a flag to this field. May be called once per spelling.
    pub fn option(&mut self, descriptor: OptionDescriptor) -> &mut Self {
        self.annotations.push(Annotation::Option(descriptor));
        self
    }

    /// Make this field a positional argument slot.
    pub fn argument(&mut self, descriptor: ArgumentDescriptor) -> &mut Self {
        self.annotations.push(Annotation::Argument(descriptor));
        self
    }

    /// Collect leftover positional tokens into this field.
    pub fn catch_all(&mut self) -> &mut Self {
        self.annotations.push(Annotation::CatchAll);
        self
    }

    /// Help text for the field as a whole.
    pub fn describe(&mut self, text: &str) -> &mut Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Collects the fields of `T` in declaration order.
pub struct Declaration<T> {
    pub(crate) fields: Vec<FieldDecl<T>>,
}

impl<T: 'static> Declaration<T> {
    pub(crate) fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare a field reached through `access`.
    ///
    /// ```
    /// # use optbind::{Declaration, DefinitionError, OptionDescriptor, Options};
    /// #[derive(Default)]
    /// struct Cli {
    ///     count: u32,
    /// }
    ///
    /// impl Options for Cli {
    ///     fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
    ///         decl.field("count", |c| &mut c.count)
    ///             .option(OptionDescriptor::integer("-n")?)
    ///             .option(OptionDescriptor::integer("--count")?);
    ///         Ok(())
    ///     }
    /// }
    /// ```
    pub fn field<V>(&mut self, name: &str, access: fn(&mut T) -> &mut V) -> &mut FieldDecl<T>
    where
        V: FieldValue + 'static,
    {
        self.push(FieldDecl {
            name: name.to_string(),
            field_type: V::field_type(),
            description: None,
            annotations: Vec::new(),
            access: erase(move |t: &mut T| access(t) as &mut dyn FieldValue),
        })
    }

    /// Splice in every field declared by a nested options struct.
    pub fn include<U>(&mut self, access: fn(&mut T) -> &mut U) -> Result<(), DefinitionError>
    where
        U: Options,
    {
        let mut nested = Declaration::<U>::new();
        U::declare(&mut nested)?;
        for field in nested.fields {
            let inner = field.access;
            self.push(FieldDecl {
                name: field.name,
                field_type: field.field_type,
                description: field.description,
                annotations: field.annotations,
                access: erase(move |t: &mut T| inner(access(t))),
            });
        }
        Ok(())
    }

    fn push(&mut self, field: FieldDecl<T>) -> &mut FieldDecl<T> {
        self.fields.push(field);
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    pub fn fields(&self) -> &[FieldDecl<T>] {
        &self.fields
    }
}

/// Run `T::declare` into a fresh declaration.
pub(crate) fn collect<T: Options>() -> Result<Declaration<T>, DefinitionError> {
    let mut decl = Declaration::new();
    T::declare(&mut decl)?;
    Ok(decl)
}
