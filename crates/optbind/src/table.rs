//! The option table: built once per container type, then used to map any
//! number of argument lists onto instances of that type.

use crate::declare::{self, Accessor, Annotation, Declaration, Options};
use crate::descriptor::{self, ArgumentDescriptor, OptionDescriptor};
use crate::error::{DefinitionError, ParseError, ResponseFileError};
use crate::expand::RawArgument;
use crate::field::{FieldType, Value};
use crate::info::{ArgumentInfo, FlagInfo, OptionGroupInfo, TableInfo};
use crate::token::{self, Token};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

struct BoundField<T> {
    name: String,
    field_type: FieldType,
    description: Option<String>,
    options: Vec<OptionDescriptor>,
    access: Accessor<T>,
}

/// Lookup tables for one container type.
pub struct OptionTable<T> {
    fields: Vec<BoundField<T>>,
    /// flag spelling → (field index, descriptor)
    options: HashMap<String, (usize, OptionDescriptor)>,
    /// Positional slots, ascending by order.
    arguments: Vec<(usize, ArgumentDescriptor)>,
    catch_all: Option<usize>,
}

impl<T: Options> OptionTable<T> {
    /// Discover and validate every field `T` declares.
    pub fn new() -> Result<Self, DefinitionError> {
        Self::from_declaration(declare::collect::<T>()?)
    }
}

impl<T: 'static> OptionTable<T> {
    pub fn from_declaration(decl: Declaration<T>) -> Result<Self, DefinitionError> {
        let mut table = OptionTable {
            fields: Vec::with_capacity(decl.fields.len()),
            options: HashMap::new(),
            arguments: Vec::new(),
            catch_all: None,
        };

        validate_container(&decl)?;

        for field in decl.fields {
            let index = table.fields.len();
            let mut options = Vec::new();

            for annotation in &field.annotations {
                validate_field(&field.name, field.field_type, annotation)?;
                match annotation {
                    // Uniqueness is checked by validate_container
                    Annotation::CatchAll => table.catch_all = Some(index),
                    Annotation::Option(option) => {
                        match table.options.get(option.flag()) {
                            Some((owner, _)) if *owner == index => continue,
                            Some((owner, _)) => {
                                return Err(DefinitionError::DuplicateFlag {
                                    flag: option.flag().to_string(),
                                    first: table.fields[*owner].name.clone(),
                                    second: field.name.clone(),
                                });
                            }
                            None => {}
                        }
                        table
                            .options
                            .insert(option.flag().to_string(), (index, option.clone()));
                        options.push(option.clone());
                    }
                    Annotation::Argument(argument) => {
                        table.arguments.push((index, argument.clone()));
                    }
                }
            }

            table.fields.push(BoundField {
                name: field.name,
                field_type: field.field_type,
                description: field.description,
                options,
                access: field.access,
            });
        }

        table.arguments.sort_by_key(|(_, argument)| argument.order());
        for pair in table.arguments.windows(2) {
            let ((a, first), (b, second)) = (&pair[0], &pair[1]);
            if first.order() == second.order() {
                return Err(DefinitionError::DuplicateOrder {
                    order: first.order(),
                    first: table.fields[*a].name.clone(),
                    second: table.fields[*b].name.clone(),
                });
            }
        }

        debug!(
            fields = table.fields.len(),
            flags = table.options.len(),
            arguments = table.arguments.len(),
            catch_all = table.catch_all.is_some(),
            "built option table"
        );
        Ok(table)
    }

    /// Map plain arguments onto `target`. Response files are not expanded
    /// here; see [`OptionTable::try_map`] with [`crate::expand`].
    ///
    /// Returns the positional tokens nobody claimed, or an empty list when
    /// the container has a catch-all field (they are appended there).
    pub fn map<I>(&self, args: I, target: &mut T) -> Result<Vec<String>, ParseError>
    where
        I: IntoIterator,
        I::Item: RawArgument,
    {
        self.try_map(
            args.into_iter().filter_map(RawArgument::into_raw).map(Ok),
            target,
        )
    }

    /// Map a possibly failing token stream, such as an [`crate::Expander`].
    pub fn try_map<I>(&self, tokens: I, target: &mut T) -> Result<Vec<String>, ParseError>
    where
        I: IntoIterator<Item = Result<String, ResponseFileError>>,
    {
        let mut tokens = tokens.into_iter().peekable();
        let mut positionals = Vec::new();

        while let Some(arg) = tokens.next() {
            let arg = arg?;
            let (flag, inline) = match token::classify(&arg) {
                Token::Malformed => return Err(ParseError::Syntax { token: arg }),
                Token::Positional => {
                    trace!(token = %arg, "positional");
                    positionals.push(arg);
                    continue;
                }
                Token::Long { flag, inline } | Token::Short { flag, inline } => (flag, inline),
            };

            let Some((index, descriptor)) = self.options.get(flag) else {
                return Err(ParseError::UnknownOption { token: arg });
            };

            let value = if !descriptor.requires_argument() || !inline.is_empty() {
                inline.to_string()
            } else {
                // A registered option must not be swallowed as a value
                let next_is_option = match tokens.peek() {
                    None => true,
                    Some(Ok(next)) => {
                        if let Token::Malformed = token::classify(next) {
                            return Err(ParseError::Syntax {
                                token: next.clone(),
                            });
                        }
                        self.is_registered(next)
                    }
                    Some(Err(_)) => false,
                };
                match tokens.next() {
                    Some(next) if !next_is_option => next?,
                    _ => {
                        return Err(ParseError::MissingArgument {
                            option: flag.to_string(),
                        })
                    }
                }
            };

            let field = &self.fields[*index];
            if let Err(source) = descriptor.assign((field.access)(&mut *target), &value) {
                return Err(ParseError::Conversion {
                    option: flag.to_string(),
                    value,
                    source,
                });
            }
            debug!(option = flag, field = %field.name, "mapped option");
        }

        let mut rest = positionals.into_iter();
        for (index, argument) in &self.arguments {
            let field = &self.fields[*index];
            let name = argument_name(field, argument);
            match rest.next() {
                Some(value) => {
                    if let Err(source) = (field.access)(&mut *target).assign(Value::Text(&value)) {
                        return Err(ParseError::Conversion {
                            option: name.to_string(),
                            value,
                            source,
                        });
                    }
                    debug!(argument = name, "mapped positional");
                }
                None if !argument.is_optional() => {
                    return Err(ParseError::MissingPositional {
                        name: name.to_string(),
                    });
                }
                None => {}
            }
        }

        let leftovers: Vec<String> = rest.collect();
        match self.catch_all {
            Some(index) => {
                let field = &self.fields[index];
                let count = leftovers.len();
                (field.access)(&mut *target)
                    .assign(Value::Items(leftovers))
                    .map_err(|source| ParseError::Conversion {
                        option: field.name.clone(),
                        value: String::new(),
                        source,
                    })?;
                debug!(field = %field.name, count, "collected leftovers");
                Ok(Vec::new())
            }
            None => Ok(leftovers),
        }
    }

    fn is_registered(&self, arg: &str) -> bool {
        token::classify(arg)
            .option()
            .is_some_and(|(flag, _)| self.options.contains_key(flag))
    }

    /// Descriptor registered for an exact flag spelling.
    pub fn descriptor(&self, flag: &str) -> Option<&OptionDescriptor> {
        self.options.get(flag).map(|(_, descriptor)| descriptor)
    }

    /// Every registered flag spelling, sorted.
    pub fn flags(&self) -> Vec<&str> {
        let mut flags: Vec<&str> = self.options.keys().map(String::as_str).collect();
        flags.sort_unstable();
        flags
    }

    pub fn catch_all_field(&self) -> Option<&str> {
        self.catch_all.map(|index| self.fields[index].name.as_str())
    }

    /// Read-only view for help rendering and metadata export.
    pub fn info(&self) -> TableInfo {
        let arguments = self
            .arguments
            .iter()
            .map(|(index, argument)| {
                let field = &self.fields[*index];
                ArgumentInfo {
                    name: argument_name(field, argument).to_string(),
                    field: field.name.clone(),
                    optional: argument.is_optional(),
                    order: argument.order(),
                    description: argument
                        .description()
                        .or(field.description.as_deref())
                        .map(str::to_string),
                }
            })
            .collect();

        let options = self
            .fields
            .iter()
            .filter(|field| !field.options.is_empty())
            .map(|field| OptionGroupInfo {
                field: field.name.clone(),
                field_type: field.field_type.to_string(),
                description: field.description.clone(),
                flags: field
                    .options
                    .iter()
                    .map(|option| FlagInfo {
                        flag: option.flag().to_string(),
                        parameter_name: option.parameter_name().to_string(),
                        requires_argument: option.requires_argument(),
                        description: option.description().map(str::to_string),
                    })
                    .collect(),
            })
            .collect();

        TableInfo {
            arguments,
            catch_all: self.catch_all_field().map(str::to_string),
            options,
        }
    }
}

fn argument_name<'a, T>(field: &'a BoundField<T>, argument: &'a ArgumentDescriptor) -> &'a str {
    if argument.name().is_empty() {
        &field.name
    } else {
        argument.name()
    }
}

/// Checks that need the whole declaration rather than a single field.
fn validate_container<T>(decl: &Declaration<T>) -> Result<(), DefinitionError> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut catch_all: Option<&str> = None;

    for field in &decl.fields {
        if !names.insert(field.name.as_str()) {
            return Err(DefinitionError::DuplicateField(field.name.clone()));
        }

        let mut arguments = 0;
        for annotation in &field.annotations {
            match annotation {
                Annotation::CatchAll => match catch_all {
                    Some(first) => {
                        return Err(DefinitionError::DuplicateCatchAll {
                            first: first.to_string(),
                            second: field.name.clone(),
                        })
                    }
                    None => catch_all = Some(&field.name),
                },
                Annotation::Argument(_) => {
                    arguments += 1;
                    if arguments > 1 {
                        return Err(DefinitionError::DuplicateArgument {
                            field: field.name.clone(),
                        });
                    }
                }
                Annotation::Option(_) => {}
            }
        }
    }
    Ok(())
}

/// Checks one annotation against the type of the field it sits on.
fn validate_field(
    name: &str,
    field_type: FieldType,
    annotation: &Annotation,
) -> Result<(), DefinitionError> {
    match annotation {
        Annotation::Option(option) => option.validate_field(name, field_type),
        Annotation::Argument(argument) => argument.validate_field(name, field_type),
        Annotation::CatchAll => descriptor::validate_catch_all(name, field_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;

    #[derive(Default, Debug)]
    struct Sample {
        int32: i32,
        flag: bool,
        name: String,
        ratio: Option<f64>,
    }

    impl Options for Sample {
        fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
            decl.field("int32", |s| &mut s.int32)
                .option(OptionDescriptor::integer("-i")?)
                .option(OptionDescriptor::integer("--int32")?);
            decl.field("flag", |s| &mut s.flag)
                .option(OptionDescriptor::boolean("-t")?)
                .option(OptionDescriptor::boolean("--flag")?);
            decl.field("name", |s| &mut s.name)
                .option(OptionDescriptor::string("-n")?)
                .option(OptionDescriptor::string("--name")?);
            decl.field("ratio", |s| &mut s.ratio)
                .option(OptionDescriptor::floating_point("--ratio")?);
            Ok(())
        }
    }

    fn map(args: &[&str]) -> Result<(Sample, Vec<String>), ParseError> {
        let table = OptionTable::<Sample>::new().unwrap();
        let mut sample = Sample::default();
        let leftovers = table.map(args.iter().copied(), &mut sample)?;
        Ok((sample, leftovers))
    }

    #[test]
    fn long_and_short_spellings_agree() {
        let (a, rest_a) = map(&["--int32=10"]).unwrap();
        let (b, rest_b) = map(&["-i", "10"]).unwrap();
        assert_eq!(a.int32, 10);
        assert_eq!(b.int32, 10);
        assert!(rest_a.is_empty() && rest_b.is_empty());
    }

    #[test]
    fn value_forms() {
        for args in [
            &["-i10"][..],
            &["-i=10"][..],
            &["-i:10"][..],
            &["--int32:10"][..],
            &["--int32", "10"][..],
        ] {
            assert_eq!(map(args).unwrap().0.int32, 10, "args: {args:?}");
        }
    }

    #[test]
    fn boolean_does_not_consume_next_token() {
        let (s, rest) = map(&["-t", "false"]).unwrap();
        assert!(s.flag);
        assert_eq!(rest, ["false"]);

        let (s, _) = map(&["--flag=no"]).unwrap();
        assert!(!s.flag);
    }

    #[test]
    fn unknown_short_option_with_suffix() {
        let err = map(&["-x10"]).unwrap_err();
        assert!(matches!(&err, ParseError::UnknownOption { token } if token == "-x10"), "Got: {err:?}");
    }

    #[test]
    fn lone_dash_is_unknown() {
        let err = map(&["-"]).unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption { .. }));
    }

    #[test]
    fn malformed_anywhere_aborts() {
        for args in [
            &["---x"][..],
            &["a", "----"][..],
            &["-t", "b", "---long=1"][..],
            &["-n", "---x"][..],
            &["--int32", "---"][..],
        ] {
            let err = map(args).unwrap_err();
            assert!(matches!(err, ParseError::Syntax { .. }), "args: {args:?}");
        }
    }

    #[test]
    fn malformed_value_is_reported_as_itself() {
        let err = map(&["--name", "---x", "tail"]).unwrap_err();
        assert!(matches!(&err, ParseError::Syntax { token } if token == "---x"), "Got: {err:?}");
    }

    #[test]
    fn missing_value_at_end() {
        let err = map(&["--name"]).unwrap_err();
        assert!(matches!(&err, ParseError::MissingArgument { option } if option == "--name"));
    }

    #[test]
    fn registered_option_is_not_swallowed() {
        let err = map(&["--name", "-t"]).unwrap_err();
        assert!(matches!(err, ParseError::MissingArgument { .. }));
        let err = map(&["-n", "--int32=4"]).unwrap_err();
        assert!(matches!(err, ParseError::MissingArgument { .. }));
    }

    #[test]
    fn unregistered_dash_token_is_taken_as_value() {
        let (s, _) = map(&["--name", "-z"]).unwrap();
        assert_eq!(s.name, "-z");
        let (s, _) = map(&["-i", "-5"]).unwrap();
        assert_eq!(s.int32, -5);
    }

    #[test]
    fn empty_inline_value_falls_back_to_next_token() {
        let (s, _) = map(&["--name=", "bob"]).unwrap();
        assert_eq!(s.name, "bob");
    }

    #[test]
    fn conversion_errors_carry_option_and_value() {
        let err = map(&["-i", "2147483648"]).unwrap_err();
        match err {
            ParseError::Conversion { option, value, source } => {
                assert_eq!(option, "-i");
                assert_eq!(value, "2147483648");
                assert_eq!(source, ConversionError::Overflow { ty: "i32" });
            }
            other => panic!("unexpected: {other:?}"),
        }
        let err = map(&["--ratio=abc"]).unwrap_err();
        assert_eq!(
            err.conversion(),
            Some(&ConversionError::InvalidFormat { ty: "f64" })
        );
        let err = map(&["-tmaybe"]).unwrap_err();
        assert_eq!(err.conversion(), Some(&ConversionError::InvalidBooleanValue));
    }

    #[test]
    fn leftovers_keep_order() {
        let (_, rest) = map(&["1", "-t", "2", "", "3"]).unwrap();
        assert_eq!(rest, ["1", "2", "", "3"]);
    }

    #[test]
    fn table_is_reusable() {
        let table = OptionTable::<Sample>::new().unwrap();
        let mut a = Sample::default();
        let mut b = Sample::default();
        table.map(["-i", "1"], &mut a).unwrap();
        table.map(["-i", "2", "--ratio", "0.5"], &mut b).unwrap();
        assert_eq!((a.int32, a.ratio), (1, None));
        assert_eq!((b.int32, b.ratio), (2, Some(0.5)));
    }

    #[test]
    fn lookup_by_flag() {
        let table = OptionTable::<Sample>::new().unwrap();
        assert!(table.descriptor("--flag").is_some_and(|d| !d.requires_argument()));
        assert!(table.descriptor("--nope").is_none());
        assert_eq!(
            table.flags(),
            ["--flag", "--int32", "--name", "--ratio", "-i", "-n", "-t"]
        );
    }

    #[derive(Default)]
    struct TwoRests {
        first: Vec<String>,
        second: Option<Vec<String>>,
    }

    impl Options for TwoRests {
        fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
            decl.field("first", |r| &mut r.first).catch_all();
            decl.field("second", |r| &mut r.second).catch_all();
            Ok(())
        }
    }

    #[test]
    fn second_catch_all_names_both_fields() {
        let err = OptionTable::<TwoRests>::new().err();
        assert_eq!(
            err,
            Some(DefinitionError::DuplicateCatchAll {
                first: "first".into(),
                second: "second".into(),
            })
        );
    }
}
