//! Work out what an element or attribute is from the ontology.
//!
//! An element's type comes either from an `xsi:type` override or from
//! the `owl:allValuesFrom` restrictions of the subject class and its
//! superclasses, searched breadth first.
use log::{debug, warn};

use crate::error::{invalid, Xml2OwlError};
use crate::io::xml::Element;
use crate::model::*;
use crate::ontology::{OntologyModel, Restriction, SuperClass};
use crate::vocab::{is_xsd_datatype, property_name, Namespace, DATATYPE_SUFFIX};

use std::collections::{HashSet, VecDeque};

pub struct TypeResolver<'a, O: OntologyModel> {
    ont: &'a O,
    b: &'a Build,
    namespace: &'a str,
}

impl<'a, O: OntologyModel> TypeResolver<'a, O> {
    /// A resolver for a document whose unqualified names are in
    /// `namespace`.
    pub fn new(ont: &'a O, b: &'a Build, namespace: &'a str) -> TypeResolver<'a, O> {
        TypeResolver { ont, b, namespace }
    }

    /// The type of `element` as a child of an instance of `class`.
    ///
    /// An `xsi:type` override wins over the restrictions of `class`.
    /// Fails only if the override uses an undeclared prefix.
    pub fn resolve_element(
        &self,
        class: &IRI,
        element: &Element,
    ) -> Result<Option<TypedResource>, Xml2OwlError> {
        match self.xsi_type(element)? {
            Some(iri) => {
                let tr = self.resource_type(&iri);
                if tr.is_none() {
                    warn!("xsi:type of {} names no known type: {}", element, iri);
                }
                Ok(tr)
            }
            None => Ok(self.resolve(class, &element.local_name)),
        }
    }

    /// The IRI named by the `xsi:type` of `element`, if it has one.
    pub fn xsi_type(&self, element: &Element) -> Result<Option<String>, Xml2OwlError> {
        let value = match element.attribute_ns(Namespace::XSI, "type").map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(None),
        };

        match value.split_once(':') {
            Some((prefix, local)) => {
                let ns = element.lookup_namespace(prefix).ok_or_else(|| {
                    Xml2OwlError::mapping(format!(
                        "Undeclared prefix {:?} in xsi:type=\"{}\"",
                        prefix, value
                    ))
                })?;

                if ns.ends_with('#') {
                    Ok(Some(format!("{}{}", ns, local)))
                } else {
                    Ok(Some(format!("{}#{}", ns, local)))
                }
            }
            None => Ok(Some(format!("{}{}", self.namespace, value))),
        }
    }

    /// Look up a type by IRI.
    ///
    /// XSD datatypes are taken as they are; otherwise the IRI must
    /// name an `owl:Class`, or with a `Datatype` suffix an
    /// `rdfs:Datatype`.
    pub fn resource_type(&self, iri: &str) -> Option<TypedResource> {
        if is_xsd_datatype(iri) {
            return Some(TypedResource::datatype(self.b.iri(iri)));
        }

        if let Some(c) = self.ont.class(iri).filter(|c| c.is_class()) {
            return Some(TypedResource::class(c.iri().clone()));
        }

        let datatype = if iri.ends_with(DATATYPE_SUFFIX) {
            iri.to_string()
        } else {
            format!("{}{}", iri, DATATYPE_SUFFIX)
        };

        self.ont
            .class(&datatype)
            .filter(|c| c.is_datatype())
            .map(|c| TypedResource::datatype(c.iri().clone()))
    }

    /// The range of the property for `local_name` on instances of
    /// `class`.
    ///
    /// The first matching restriction in breadth first order over
    /// `class` and its named superclasses wins. Each class is searched
    /// once, however often it is reached.
    pub fn resolve(&self, class: &IRI, local_name: &str) -> Option<TypedResource> {
        let op_name = property_name(self.ont.object_property_prefix(), local_name);
        let dtp_name = property_name(self.ont.datatype_property_prefix(), local_name);

        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        queue.push_back(class);
        visited.insert(class);

        while let Some(current) = queue.pop_front() {
            let superclasses = self.ont.direct_superclasses(current);

            for r in superclasses
                .iter()
                .filter_map(SuperClass::as_restriction)
                .filter(|r| r.is_all_values_from())
            {
                match self.match_restriction(r, &op_name, &dtp_name) {
                    Ok(Some(tr)) => {
                        debug!("{} on {} resolved to {:?}", local_name, current, tr);
                        return Some(tr);
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Skipping restriction of {}: {}", current, e),
                }
            }

            for sc in superclasses.iter().filter_map(SuperClass::as_named) {
                if visited.insert(sc) {
                    queue.push_back(sc);
                }
            }
        }

        None
    }

    fn match_restriction(
        &self,
        r: &Restriction,
        op_name: &str,
        dtp_name: &str,
    ) -> Result<Option<TypedResource>, Xml2OwlError> {
        let property = r.property()?;
        let name = property.local_name();
        let kind = self.ont.property_kind(property);

        // With identical prefixes one name can be both kinds of
        // property; the range decides.
        if name == op_name
            && self.ont.object_property_prefix() == self.ont.datatype_property_prefix()
            && kind.is_dual()
        {
            let range = r.range()?;
            if self.resource_type(range).map(|tr| tr.is_datatype()) == Some(true) {
                return Ok(Some(TypedResource::datatype(range.clone())));
            }
        }

        if name == op_name && kind.is_object() {
            return Ok(Some(TypedResource::class(r.range()?.clone())));
        }

        if name == dtp_name && kind.is_datatype() {
            return Ok(Some(TypedResource::datatype(r.range()?.clone())));
        }

        if (name == op_name || name == dtp_name) && !kind.is_declared() {
            return Err(invalid!(
                "{} is neither an object nor a datatype property",
                property
            ));
        }

        Ok(None)
    }
}
