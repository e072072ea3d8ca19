use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use log::warn;

use crate::errors::LoadError;


/// Vertex as read from a graph document, position still in source units
#[derive(Clone, Debug, PartialEq)]
pub struct RawVertex {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Edge as read from a graph document
/// weight is None when the record carries no "peso"
#[derive(Clone, Debug, PartialEq)]
pub struct RawEdge {
    pub a: String,
    pub b: String,
    pub weight: Option<f64>,
    pub annotation: Option<String>,
}

/// Parsed graph document
/// Records that could not be read are counted, not kept
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphDocument {
    pub vertices: Vec<RawVertex>,
    pub edges: Vec<RawEdge>,
    pub malformed_vertices: usize,
    pub malformed_edges: usize,
}

impl GraphDocument {

    /// Parse a document of the form {"vertices": [...], "arestas": [...]}
    /// A missing "arestas" array is read as a graph without edges
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let root: Value = serde_json::from_str(json)?;

        let vertex_values = root
            .get("vertices")
            .and_then(Value::as_array)
            .ok_or(LoadError::MissingVertices)?;

        let mut doc = GraphDocument::default();

        for value in vertex_values {
            match VertexRecord::deserialize(value) {
                Ok(r) if r.x.is_finite() && r.y.is_finite() => doc.vertices.push(RawVertex {
                    id: r.id,
                    label: r.nome,
                    x: r.x,
                    y: r.y,
                }),
                Ok(r) => {
                    warn!("dropping vertex {}: non-finite position", r.id);
                    doc.malformed_vertices += 1;
                }
                Err(e) => {
                    warn!("dropping malformed vertex record: {e}");
                    doc.malformed_vertices += 1;
                }
            }
        }

        let edge_values = root.get("arestas").and_then(Value::as_array);
        for value in edge_values.into_iter().flatten() {
            match EdgeRecord::deserialize(value) {
                Ok(r) => doc.edges.push(RawEdge {
                    a: r.origem,
                    b: r.destino,
                    weight: r.peso,
                    annotation: r.motivo,
                }),
                Err(e) => {
                    warn!("dropping malformed edge record: {e}");
                    doc.malformed_edges += 1;
                }
            }
        }

        Ok(doc)
    }
}


/// Companion document overriding edge weights and annotations
/// Records are matched against edges by the unordered endpoint pair
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeightsDocument {
    #[serde(rename = "arestas")]
    pub records: Vec<WeightRecord>,
    #[serde(skip)]
    pub malformed: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    #[serde(rename = "origem", deserialize_with = "record_id")]
    pub a: String,
    #[serde(rename = "destino", deserialize_with = "record_id")]
    pub b: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "motivo", default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl WeightsDocument {

    /// Parse a document of the form {"arestas": [{"origem", "destino", "peso", "motivo"}]}
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let root: Value = serde_json::from_str(json)?;

        let mut doc = WeightsDocument::default();
        let values = root.get("arestas").and_then(Value::as_array);
        for value in values.into_iter().flatten() {
            match WeightRecord::deserialize(value) {
                Ok(r) => doc.records.push(r),
                Err(e) => {
                    warn!("dropping malformed weight record: {e}");
                    doc.malformed += 1;
                }
            }
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}


/// Result document handed to export collaborators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteExport {
    #[serde(rename = "origem")]
    pub source: String,
    #[serde(rename = "destino")]
    pub target: String,
    #[serde(rename = "caminho")]
    pub path: Vec<String>,
    #[serde(rename = "custo")]
    pub cost: f64,
}

impl RouteExport {

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}


#[derive(Deserialize)]
struct VertexRecord {
    #[serde(deserialize_with = "record_id")]
    id: String,
    nome: String,
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    #[serde(deserialize_with = "record_id")]
    origem: String,
    #[serde(deserialize_with = "record_id")]
    destino: String,
    #[serde(default)]
    peso: Option<f64>,
    #[serde(default)]
    motivo: Option<String>,
}

/// Ids may be written as strings or numbers, both are kept as strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RecordId::deserialize(deserializer)? {
        RecordId::Text(s) => s,
        RecordId::Number(n) => n.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph_document() {
        let doc = GraphDocument::from_json(r#"{
            "vertices": [
                {"id": 1, "nome": "Centro", "x": 10, "y": 20},
                {"id": "b", "nome": "Porto", "x": 30.5, "y": -4}
            ],
            "arestas": [
                {"origem": 1, "destino": "b", "peso": 3, "motivo": "Heavy traffic"},
                {"origem": "b", "destino": 1}
            ]
        }"#).unwrap();

        assert_eq!(doc.vertices.len(), 2);
        assert_eq!(doc.vertices[0], RawVertex { id: "1".into(), label: "Centro".into(), x: 10.0, y: 20.0 });
        assert_eq!(doc.edges[0].weight, Some(3.0));
        assert_eq!(doc.edges[0].annotation.as_deref(), Some("Heavy traffic"));
        assert_eq!(doc.edges[1].weight, None);
        assert_eq!(doc.malformed_vertices, 0);
        assert_eq!(doc.malformed_edges, 0);
    }

    #[test]
    fn test_malformed_records_are_counted() {
        let doc = GraphDocument::from_json(r#"{
            "vertices": [
                {"id": "a", "nome": "A", "x": 0, "y": 0},
                {"id": "b", "x": 1, "y": 1},
                {"id": "c", "nome": "C", "x": "far", "y": 1}
            ],
            "arestas": [
                {"origem": "a"},
                {"origem": "a", "destino": "c", "peso": "heavy"}
            ]
        }"#).unwrap();

        assert_eq!(doc.vertices.len(), 1);
        assert_eq!(doc.malformed_vertices, 2);
        assert!(doc.edges.is_empty());
        assert_eq!(doc.malformed_edges, 2);
    }

    #[test]
    fn test_document_shape_errors() {
        assert!(matches!(GraphDocument::from_json("not json"), Err(LoadError::Json(_))));
        assert!(matches!(GraphDocument::from_json(r#"{"arestas": []}"#), Err(LoadError::MissingVertices)));
        assert!(matches!(GraphDocument::from_json("[]"), Err(LoadError::MissingVertices)));

        let no_edges = GraphDocument::from_json(r#"{"vertices": []}"#).unwrap();
        assert!(no_edges.vertices.is_empty());
        assert!(no_edges.edges.is_empty());
    }

    #[test]
    fn test_weights_document() {
        let doc = WeightsDocument::from_json(r#"{"arestas": [
            {"origem": 2, "destino": 1, "peso": 7.5, "motivo": "Roadworks"},
            {"origem": 2, "destino": 3}
        ]}"#).unwrap();

        assert_eq!(doc.records.len(), 1);
        assert_eq!(doc.malformed, 1);
        assert_eq!(doc.records[0].a, "2");
        assert_eq!(doc.records[0].weight, 7.5);

        let json = doc.to_json().unwrap();
        let back = WeightsDocument::from_json(&json).unwrap();
        assert_eq!(back.records, doc.records);
    }

    #[test]
    fn test_route_export_field_names() {
        let export = RouteExport {
            source: "a".into(),
            target: "c".into(),
            path: vec!["a".into(), "b".into(), "c".into()],
            cost: 5.0,
        };
        let value: Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(value["origem"], "a");
        assert_eq!(value["destino"], "c");
        assert_eq!(value["caminho"][1], "b");
        assert_eq!(value["custo"], 5.0);
    }
}
