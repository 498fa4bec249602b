//! A code-emitting visitor written against the public API only.

use std::io;

use modelgraph::{
    model::{
        ClassDeclaration, EnumDeclaration, EnumValue, Field, MapDeclaration, MapEntryType,
        ModelFile, ModelManager, Relationship, ScalarDeclaration,
    },
    sink::{OutputSink, StringSink},
    visitor::{DispatchError, Visitable, Visitor, dispatch},
};

#[derive(Debug, thiserror::Error)]
enum EmitError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Emits a TypeScript-like outline of the model.
struct OutlineEmitter;

#[derive(Default)]
struct EmitParams {
    sink: StringSink,
    indent: usize,
}

impl Visitor for OutlineEmitter {
    type Params = EmitParams;
    type Output = ();
    type Error = EmitError;

    fn visit_manager(
        &self,
        manager: &ModelManager,
        params: &mut Self::Params,
    ) -> Result<(), EmitError> {
        manager
            .files()
            .iter()
            .try_for_each(|file| file.accept(self, params))
    }

    fn visit_file(&self, file: &ModelFile, params: &mut Self::Params) -> Result<(), EmitError> {
        let header = format!("// {}", file.namespace());
        params.sink.write_line(params.indent, &header)?;
        file.declarations()
            .iter()
            .try_for_each(|decl| decl.accept(self, params))
    }

    fn visit_class(
        &self,
        class: &ClassDeclaration,
        params: &mut Self::Params,
    ) -> Result<(), EmitError> {
        let header = match class.super_type() {
            Some(super_type) => format!("interface {} extends {} {{", class.name(), super_type),
            None => format!("interface {} {{", class.name()),
        };
        params.sink.write_line(params.indent, &header)?;
        params.indent += 1;
        for property in class.properties() {
            property.accept(self, params)?;
        }
        params.indent -= 1;
        params.sink.write_line(params.indent, "}")?;
        Ok(())
    }

    fn visit_enum(
        &self,
        enumeration: &EnumDeclaration,
        params: &mut Self::Params,
    ) -> Result<(), EmitError> {
        let header = format!("enum {} {{", enumeration.name());
        params.sink.write_line(params.indent, &header)?;
        params.indent += 1;
        for value in enumeration.values() {
            value.accept(self, params)?;
        }
        params.indent -= 1;
        params.sink.write_line(params.indent, "}")?;
        Ok(())
    }

    fn visit_scalar(
        &self,
        scalar: &ScalarDeclaration,
        params: &mut Self::Params,
    ) -> Result<(), EmitError> {
        let line = format!("type {} = {};", scalar.name(), scalar.scalar_type());
        Ok(params.sink.write_line(params.indent, &line)?)
    }

    fn visit_map(&self, map: &MapDeclaration, params: &mut Self::Params) -> Result<(), EmitError> {
        let line = format!(
            "type {} = Map<{}, {}>;",
            map.name(),
            map.key().type_name(),
            map.value().type_name()
        );
        Ok(params.sink.write_line(params.indent, &line)?)
    }

    fn visit_field(&self, field: &Field, params: &mut Self::Params) -> Result<(), EmitError> {
        let line = format!("{}: {};", field.name(), field.type_name());
        Ok(params.sink.write_line(params.indent, &line)?)
    }

    fn visit_relationship(
        &self,
        relationship: &Relationship,
        params: &mut Self::Params,
    ) -> Result<(), EmitError> {
        let line = format!("{}: Ref<{}>;", relationship.name(), relationship.type_name());
        Ok(params.sink.write_line(params.indent, &line)?)
    }

    fn visit_enum_value(
        &self,
        value: &EnumValue,
        params: &mut Self::Params,
    ) -> Result<(), EmitError> {
        let line = format!("{},", value.name());
        Ok(params.sink.write_line(params.indent, &line)?)
    }
}

fn sample() -> ModelManager {
    ModelManager::from_files(vec![
        ModelFile::new("org.acme@1.0.0")
            .with_declaration(
                ClassDeclaration::new("Person")
                    .with_property(Field::new("name", "String"))
                    .with_property(Relationship::new("friend", "org.acme@1.0.0.Person")),
            )
            .with_declaration(
                EnumDeclaration::new("Color").with_value(EnumValue::new("RED")),
            )
            .with_declaration(ScalarDeclaration::new("Email", "String"))
            .with_declaration(MapDeclaration::new(
                "Phonebook",
                MapEntryType::new("String"),
                MapEntryType::new("org.acme@1.0.0.Person"),
            )),
    ])
}

#[test]
fn test_emitter_writes_through_sink() {
    let mut params = EmitParams::default();
    sample().accept(&OutlineEmitter, &mut params).unwrap();

    assert_eq!(
        params.sink.as_str(),
        "// org.acme@1.0.0\n\
         interface Person {\n\
         \x20  name: String;\n\
         \x20  friend: Ref<org.acme@1.0.0.Person>;\n\
         }\n\
         enum Color {\n\
         \x20  RED,\n\
         }\n\
         type Email = String;\n\
         type Phonebook = Map<String, org.acme@1.0.0.Person>;\n"
    );
}

#[test]
fn test_emitter_rejects_literal_input() {
    let mut params = EmitParams::default();
    let err = dispatch(&OutlineEmitter, "Person", &mut params).unwrap_err();

    assert!(matches!(err, EmitError::Dispatch(DispatchError::UnrecognizedNodeKind { .. })));
    assert!(params.sink.as_str().is_empty());
}

#[test]
fn test_emitter_handles_single_declaration() {
    let mut params = EmitParams::default();
    let scalar = ScalarDeclaration::new("Email", "String");

    dispatch(&OutlineEmitter, &scalar, &mut params).unwrap();
    assert_eq!(params.sink.as_str(), "type Email = String;\n");
}
