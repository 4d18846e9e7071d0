//! The table of annotations accumulated while a docblock is scanned.
//!
//! States only ever talk to the most recently registered annotation.  The
//! table is turned into an [`AnnotationMap`] once the scan has finished,
//! because only then is every argument binding known.

use crate::annotation::{Annotation, AnnotationMap, Annotations, ParamValue, Params, VALUE_KEY};

#[derive(Debug)]
struct Pending {
    name: String,
    cast: Option<String>,
    argument: Option<String>,
    params: Params,
}

#[derive(Debug, Default)]
pub(crate) struct Table {
    pending: Vec<Pending>,
    current_param: Option<String>,
}

impl Table {
    pub(crate) fn reset(&mut self) {
        self.pending.clear();
        self.current_param = None;
    }

    pub(crate) fn register_annotation(&mut self, name: String) {
        self.current_param = None;
        self.pending.push(Pending {
            name,
            cast: None,
            argument: None,
            params: Params::new(),
        });
    }

    fn current(&mut self) -> Result<&mut Pending, String> {
        self.pending
            .last_mut()
            .ok_or_else(|| "no annotation is open".to_string())
    }

    pub(crate) fn set_type(&mut self, annotation_type: String) -> Result<(), String> {
        let current = self.current()?;
        if let Some(existing) = &current.cast {
            return Err(format!(
                "annotation `{}` is already cast to `{existing}`",
                current.name
            ));
        }
        current.cast = Some(annotation_type);
        Ok(())
    }

    pub(crate) fn bind_argument(&mut self, argument: String) -> Result<(), String> {
        let current = self.current()?;
        if let Some(existing) = &current.argument {
            return Err(format!(
                "annotation `{}` is already bound to argument `{existing}`",
                current.name
            ));
        }
        current.argument = Some(argument);
        Ok(())
    }

    pub(crate) fn register_param(&mut self, name: &str) {
        self.current_param = Some(name.to_string());
    }

    /// Store a value under the parameter registered last, or under
    /// [`VALUE_KEY`] when no name was given.
    pub(crate) fn set_param_value(&mut self, value: String, quoted: bool) -> Result<(), String> {
        let name = self
            .current_param
            .take()
            .unwrap_or_else(|| VALUE_KEY.to_string());
        let current = self.current()?;

        if !quoted && value.is_empty() {
            return Err(format!("parameter `{name}` has no value"));
        }
        if name == VALUE_KEY {
            if current.params.contains(VALUE_KEY) {
                return Err(format!(
                    "annotation `{}` can only have one unnamed value",
                    current.name
                ));
            }
            if current.params.has_named() {
                return Err(format!(
                    "annotation `{}` mixes an unnamed value with named parameters",
                    current.name
                ));
            }
        } else if current.params.contains(VALUE_KEY) {
            return Err(format!(
                "annotation `{}` mixes an unnamed value with named parameters",
                current.name
            ));
        }

        current.params.insert(name, ParamValue::new(value, quoted));
        Ok(())
    }

    /// Convert the accumulated records, keyed by `target` or
    /// `target#argument`.
    pub(crate) fn finish(&mut self, target: &str) -> AnnotationMap {
        self.current_param = None;
        let mut map = AnnotationMap::new();
        for pending in self.pending.drain(..) {
            let key = match &pending.argument {
                Some(argument) => format!("{target}#{argument}"),
                None => target.to_string(),
            };
            let annotation_type = pending.cast.unwrap_or_else(|| pending.name.clone());
            let annotation =
                Annotation::new(pending.name, annotation_type, key.clone(), pending.params);
            map.entry(key.clone())
                .or_insert_with(|| Annotations::new(key))
                .push(annotation);
        }
        map
    }
}
