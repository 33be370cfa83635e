use camgeom_core::{PointSet, ProjectionError};
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use std::io::Write;

/// Writes a set of 3d points as an ASCII PLY point cloud so it can be inspected in a viewer.
pub fn export(mut writer: impl Write, points: &PointSet) -> Result<(), ExportError> {
    points.expect_dim("exported points", 3)?;

    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header
        .comments
        .push("Exported from camgeom".to_string());

    // The vertex count is filled in by the writer.
    let mut point_element = ElementDef::new("vertex".to_string());
    for axis in ["x", "y", "z"] {
        let p = PropertyDef::new(axis.to_string(), PropertyType::Scalar(ScalarType::Double));
        point_element.properties.add(p);
    }
    ply.header.elements.add(point_element);

    let vertices: Vec<_> = points
        .points()
        .map(|p| {
            let mut vertex = DefaultElement::new();
            vertex.insert("x".to_string(), Property::Double(p[0]));
            vertex.insert("y".to_string(), Property::Double(p[1]));
            vertex.insert("z".to_string(), Property::Double(p[2]));
            vertex
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertices);

    Writer::new().write_ply(&mut writer, &mut ply)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write point cloud: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
