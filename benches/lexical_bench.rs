#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fmt::Write;
use xmlschema_lexical::documents::Document;
use xmlschema_lexical::validators::{collapse_whitespace, LexicalContext, LexicalSpace};
use xmlschema_lexical::{Error, LexicalError, XSD_NAMESPACE};

/// Schema with `count` element declarations carrying typical attributes
fn make_schema(count: usize) -> String {
    let mut xml = format!(
        r#"<xs:schema xmlns:xs="{}" targetNamespace="urn:bench">"#,
        XSD_NAMESPACE
    );
    for i in 0..count {
        let _ = write!(
            xml,
            r#"<xs:element name="e{i}" type="xs:string" minOccurs="0" maxOccurs="{}" nillable="false" substitutionGroup="xs:a xs:b xs:c"/>"#,
            i + 1
        );
    }
    xml.push_str("</xs:schema>");
    xml
}

fn bench_normalize(c: &mut Criterion) {
    let text = " \t a  list\nof\r\n  tokens   with  irregular   spacing \t".repeat(16);
    c.bench_function("collapse_whitespace", |b| {
        b.iter(|| collapse_whitespace(black_box(&text)))
    });
}

fn bench_convert(c: &mut Criterion) {
    let doc = Document::from_string(&make_schema(100)).unwrap();
    let root = doc.root_element().unwrap();
    let elements: Vec<_> = doc.child_elements(root).collect();
    let ctx = LexicalContext::new(Error::Lexical as fn(LexicalError) -> Error);

    let cases = [
        ("type", LexicalSpace::QName),
        ("minOccurs", LexicalSpace::NonNegativeInteger),
        ("maxOccurs", LexicalSpace::PositiveInteger),
        ("nillable", LexicalSpace::Boolean),
        ("substitutionGroup", LexicalSpace::QNameList),
        ("name", LexicalSpace::NcName),
    ];
    for (attribute, space) in cases {
        c.bench_function(&format!("convert_{}", attribute), |b| {
            b.iter(|| {
                for &element in &elements {
                    let attr = doc.attribute(element, attribute).unwrap();
                    black_box(space.convert(&ctx, &attr).unwrap());
                }
            })
        });
    }

    let target = doc.attribute(root, "targetNamespace").unwrap();
    c.bench_function("convert_anyURI", |b| {
        b.iter(|| black_box(LexicalSpace::AnyUri.convert(&ctx, &target).unwrap()))
    });
}

criterion_group!(normalize, bench_normalize);
criterion_group!(convert, bench_convert);

criterion_main!(normalize, convert);
