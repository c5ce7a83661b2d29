//! One-call parsing: expand response files, build (or reuse) the table for
//! the container type, and map.

use crate::declare::Options;
use crate::error::Error;
use crate::expand::{self, RawArgument};
use crate::table::OptionTable;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

thread_local! {
    static TABLES: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

/// The table for `T`, built on first use and cached for this thread.
pub fn table<T: Options>() -> Result<Rc<OptionTable<T>>, Error> {
    let cached = TABLES.with(|tables| tables.borrow().get(&TypeId::of::<T>()).cloned());
    if let Some(table) = cached.and_then(|t| t.downcast::<OptionTable<T>>().ok()) {
        return Ok(table);
    }

    let table = Rc::new(OptionTable::<T>::new()?);
    TABLES.with(|tables| {
        tables
            .borrow_mut()
            .insert(TypeId::of::<T>(), table.clone() as Rc<dyn Any>)
    });
    Ok(table)
}

/// Parse `args` into a fresh `T`, discarding nothing: leftovers are
/// returned alongside.
pub fn parse<T, I>(args: I) -> Result<(T, Vec<String>), Error>
where
    T: Options,
    I: IntoIterator,
    I::Item: RawArgument,
{
    let mut container = T::default();
    let leftovers = parse_into(&mut container, args)?;
    Ok((container, leftovers))
}

/// Parse `args` onto an existing container, keeping values not mentioned.
pub fn parse_into<T, I>(container: &mut T, args: I) -> Result<Vec<String>, Error>
where
    T: Options,
    I: IntoIterator,
    I::Item: RawArgument,
{
    let table = table::<T>()?;
    Ok(table.try_map(expand::expand(args), container)?)
}

/// Parse the process arguments (without the program name).
pub fn parse_env<T: Options>() -> Result<(T, Vec<String>), Error> {
    parse(std::env::args().skip(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::Declaration;
    use crate::descriptor::OptionDescriptor;
    use crate::error::{DefinitionError, ParseError};

    #[derive(Default)]
    struct Counter {
        count: u8,
    }

    impl Options for Counter {
        fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
            decl.field("count", |c| &mut c.count)
                .option(OptionDescriptor::integer("-c")?);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Broken {
        flag: i32,
    }

    impl Options for Broken {
        fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
            decl.field("flag", |b| &mut b.flag)
                .option(OptionDescriptor::boolean("-f")?);
            Ok(())
        }
    }

    #[test]
    fn parse_fresh_container() {
        let (c, rest) = parse::<Counter, _>(["-c", "7", "x"]).unwrap();
        assert_eq!(c.count, 7);
        assert_eq!(rest, ["x"]);
    }

    #[test]
    fn empty_arguments_give_default() {
        let (c, rest) = parse::<Counter, _>(Vec::<String>::new()).unwrap();
        assert_eq!(c.count, 0);
        assert!(rest.is_empty());
    }

    #[test]
    fn table_is_cached_per_type() {
        let a = table::<Counter>().unwrap();
        let b = table::<Counter>().unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn parse_into_keeps_existing_values() {
        let mut c = Counter { count: 3 };
        parse_into(&mut c, ["x"]).unwrap();
        assert_eq!(c.count, 3);
    }

    #[test]
    fn definition_errors_surface() {
        let err = parse::<Broken, _>(["-f"]).map(|_| ()).unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::FieldTypeMismatch { .. })
        ));
    }

    #[test]
    fn parse_errors_surface() {
        let err = parse::<Counter, _>(["-c", "300"]).map(|_| ()).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Conversion { .. })));
    }
}
