//! Reader and printer for the XML model document.
//!
//! The document is a flat, CellML-shaped dialect: a `model` element holding
//! `units`, `component` (with `variable` and `math` children), and
//! `connection` elements. A `units` element carrying `source`/`reference`
//! attributes is an import forward resolved during flattening.

use serde::{Deserialize, Serialize};

use super::{Component, Equivalence, Interface, Model, UnitTerm, Units, UnitsKind, Variable};
use crate::error::Issue;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "model")]
struct ModelXml {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "units", default, skip_serializing_if = "Vec::is_empty")]
    units: Vec<UnitsXml>,
    #[serde(rename = "component", default, skip_serializing_if = "Vec::is_empty")]
    components: Vec<ComponentXml>,
    #[serde(rename = "connection", default, skip_serializing_if = "Vec::is_empty")]
    connections: Vec<ConnectionXml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UnitsXml {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@source", default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(rename = "@reference", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(rename = "unit", default, skip_serializing_if = "Vec::is_empty")]
    terms: Vec<UnitXml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UnitXml {
    #[serde(rename = "@units", default)]
    units: String,
    #[serde(rename = "@prefix", default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(rename = "@exponent", default, skip_serializing_if = "Option::is_none")]
    exponent: Option<f64>,
    #[serde(rename = "@multiplier", default, skip_serializing_if = "Option::is_none")]
    multiplier: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ComponentXml {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "variable", default, skip_serializing_if = "Vec::is_empty")]
    variables: Vec<VariableXml>,
    #[serde(rename = "math", default, skip_serializing_if = "Option::is_none")]
    math: Option<MathXml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VariableXml {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@units", default)]
    units: String,
    #[serde(rename = "@interface", default, skip_serializing_if = "Option::is_none")]
    interface: Option<String>,
    #[serde(rename = "@initial_value", default, skip_serializing_if = "Option::is_none")]
    initial_value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MathXml {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConnectionXml {
    #[serde(rename = "@component_1", default)]
    component_1: String,
    #[serde(rename = "@variable_1", default)]
    variable_1: String,
    #[serde(rename = "@component_2", default)]
    component_2: String,
    #[serde(rename = "@variable_2", default)]
    variable_2: String,
}

/// Parse a model document, reporting structural issues as a list.
pub fn parse(text: &str) -> Result<Model, Vec<Issue>> {
    let doc: ModelXml = quick_xml::de::from_str(text)
        .map_err(|err| vec![Issue::new(format!("malformed model document: {err}"))])?;

    let mut issues = Vec::new();
    if doc.name.is_empty() {
        issues.push(Issue::new("model has no name"));
    }

    let mut model = Model::new(doc.name);
    for units in doc.units {
        if units.name.is_empty() {
            issues.push(Issue::new("units entry has no name"));
            continue;
        }
        match (units.source, units.reference) {
            (Some(source), Some(reference)) => {
                model.add_units(Units::imported(units.name, source, reference));
            }
            (None, None) => {
                let terms = units
                    .terms
                    .into_iter()
                    .map(|t| UnitTerm {
                        units: t.units,
                        prefix: t.prefix,
                        exponent: t.exponent.unwrap_or(1.0),
                        multiplier: t.multiplier.unwrap_or(1.0),
                    })
                    .collect();
                model.add_units(Units::defined(units.name, terms));
            }
            _ => issues.push(Issue::new(format!(
                "units '{}' has an incomplete import (both source and reference are required)",
                units.name
            ))),
        }
    }

    for component in doc.components {
        if component.name.is_empty() {
            issues.push(Issue::new("component has no name"));
            continue;
        }
        let mut comp = Component::new(component.name);
        for variable in component.variables {
            if variable.name.is_empty() {
                issues.push(Issue::new(format!(
                    "variable in component '{}' has no name",
                    comp.name()
                )));
                continue;
            }
            let mut var = Variable::new(variable.name, variable.units);
            var.interface = match variable.interface.as_deref() {
                Some("public") => Interface::Public,
                Some("private") | None => Interface::Private,
                Some(other) => {
                    issues.push(Issue::new(format!(
                        "variable '{}' in component '{}' has unknown interface '{other}'",
                        var.name,
                        comp.name()
                    )));
                    Interface::Private
                }
            };
            var.initial_value = variable.initial_value;
            comp.add_variable(var);
        }
        if let Some(math) = component.math {
            for line in math.text.lines() {
                let line = line.trim();
                if !line.is_empty() {
                    comp.append_math(line);
                }
            }
        }
        model.add_component(comp);
    }

    for connection in doc.connections {
        model.add_equivalence(
            super::VariableRef::new(connection.component_1, connection.variable_1),
            super::VariableRef::new(connection.component_2, connection.variable_2),
        );
    }

    if issues.is_empty() {
        Ok(model)
    } else {
        Err(issues)
    }
}

/// Print a model as an XML document with a declaration header.
pub fn print(model: &Model) -> Result<String, quick_xml::SeError> {
    let doc = to_doc(model);
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    doc.serialize(serializer)?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}\n"))
}

fn to_doc(model: &Model) -> ModelXml {
    ModelXml {
        name: model.name().to_string(),
        units: model.units().iter().map(units_to_xml).collect(),
        components: model.components().iter().map(component_to_xml).collect(),
        connections: model.equivalences().iter().map(connection_to_xml).collect(),
    }
}

fn units_to_xml(units: &Units) -> UnitsXml {
    match &units.kind {
        UnitsKind::Defined(terms) => UnitsXml {
            name: units.name.clone(),
            source: None,
            reference: None,
            terms: terms
                .iter()
                .map(|t| UnitXml {
                    units: t.units.clone(),
                    prefix: t.prefix.clone(),
                    // attribute defaults keep the common case terse
                    exponent: (t.exponent != 1.0).then_some(t.exponent),
                    multiplier: (t.multiplier != 1.0).then_some(t.multiplier),
                })
                .collect(),
        },
        UnitsKind::Imported { source, reference } => UnitsXml {
            name: units.name.clone(),
            source: Some(source.clone()),
            reference: Some(reference.clone()),
            terms: Vec::new(),
        },
    }
}

fn component_to_xml(component: &Component) -> ComponentXml {
    ComponentXml {
        name: component.name().to_string(),
        variables: component
            .variables()
            .iter()
            .map(|v| VariableXml {
                name: v.name.clone(),
                units: v.units.clone(),
                interface: v.interface.is_public().then(|| "public".to_string()),
                initial_value: v.initial_value.clone(),
            })
            .collect(),
        math: if component.math().is_empty() {
            None
        } else {
            Some(MathXml {
                text: component.math().join("\n"),
            })
        },
    }
}

fn connection_to_xml(eq: &Equivalence) -> ConnectionXml {
    ConnectionXml {
        component_1: eq.a.component.clone(),
        variable_1: eq.a.variable.clone(),
        component_2: eq.b.component.clone(),
        variable_2: eq.b.variable.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VESSEL: &str = r#"
        <model name="vessel_library">
          <units name="ml_per_s">
            <unit units="litre" prefix="milli"/>
            <unit units="second" exponent="-1"/>
          </units>
          <component name="artery">
            <variable name="t" units="second" interface="public"/>
            <variable name="flow" units="ml_per_s" interface="public"/>
            <variable name="resistance" units="ml_per_s" initial_value="1.5"/>
            <math>flow = resistance * 2{ml_per_s}</math>
          </component>
          <connection component_1="artery" variable_1="t" component_2="env" variable_2="time"/>
        </model>
    "#;

    #[test]
    fn test_parse_model() {
        let model = parse(VESSEL).unwrap();
        assert_eq!(model.name(), "vessel_library");

        let units = model.units_by_name("ml_per_s").unwrap();
        let UnitsKind::Defined(terms) = &units.kind else {
            panic!("expected a defined units entry");
        };
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].prefix.as_deref(), Some("milli"));
        assert_eq!(terms[1].exponent, -1.0);

        let artery = model.component("artery").unwrap();
        assert_eq!(artery.variables().len(), 3);
        assert!(artery.variable("t").unwrap().interface.is_public());
        assert!(!artery.variable("resistance").unwrap().interface.is_public());
        assert_eq!(
            artery.variable("resistance").unwrap().initial_value.as_deref(),
            Some("1.5")
        );
        assert_eq!(artery.math(), ["flow = resistance * 2{ml_per_s}"]);
        assert_eq!(model.equivalences().len(), 1);
    }

    #[test]
    fn test_parse_reports_structural_issues() {
        let issues = parse("<model><component/></model>").unwrap_err();
        let all: Vec<_> = issues.iter().map(|i| i.description.as_str()).collect();
        assert!(all.contains(&"model has no name"));
        assert!(all.contains(&"component has no name"));
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        let issues = parse("<model name=\"x\"").unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.starts_with("malformed model document"));
    }

    #[test]
    fn test_printed_model_parses_back() {
        let model = parse(VESSEL).unwrap();
        let printed = print(&model).unwrap();
        assert!(printed.starts_with("<?xml version=\"1.0\""));

        let reparsed = parse(&printed).unwrap();
        assert_eq!(reparsed.name(), model.name());
        assert_eq!(reparsed.components().len(), model.components().len());
        assert_eq!(
            reparsed.component("artery").unwrap().math(),
            model.component("artery").unwrap().math()
        );
        assert_eq!(reparsed.equivalences(), model.equivalences());
    }

    #[test]
    fn test_import_forward_roundtrip() {
        let mut model = Model::new("m");
        model.add_units(Units::imported("mmHg", "units/pressure.xml", "mmHg"));
        let printed = print(&model).unwrap();
        let reparsed = parse(&printed).unwrap();
        let units = reparsed.units_by_name("mmHg").unwrap();
        assert!(units.is_imported());
    }

    #[test]
    fn test_incomplete_import_is_an_issue() {
        let issues =
            parse("<model name=\"m\"><units name=\"x\" source=\"lib.xml\"/></model>").unwrap_err();
        assert!(issues[0].description.contains("incomplete import"));
    }
}
