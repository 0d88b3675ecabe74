//! Conversion of slices into native values through a registry of converters.
//!
//! A [`DeserializerRegistry`] maps a target type to one [`VPackDeserializer`]. Conversions
//! run inside a [`DeserializationContext`], which carries the registry and the
//! [`VPackOptions`] of the current call so converters can recurse into nested values.
//!
//! # Example
//!
//! ```
//! use vpack::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Celsius(f64);
//!
//! let mut registry = DeserializerRegistry::new();
//! registry.register_fn(|_, v: &VPackSlice, _| Ok(Celsius(v.get_as_f64()?)));
//!
//! // 21.5
//! let slice = VPackSlice::from_static(&[0x1b, 0, 0, 0, 0, 0, 0x80, 0x35, 0x40]);
//! let options = VPackOptions::default();
//!
//! assert_eq!(
//!     registry.deserialize::<Celsius>(&slice, &options).unwrap(),
//!     Celsius(21.5)
//! );
//! assert_eq!(registry.deserialize::<f64>(&slice, &options).unwrap(), 21.5);
//! ```

mod builtin;

use crate::{
    errors::{Result, VPackError},
    options::VPackOptions,
    slice::VPackSlice,
};
use hashbrown::HashMap;
use log::debug;
use once_cell::sync::Lazy;
use std::{
    any::{type_name, Any, TypeId},
    fmt,
};

/// Converts a slice into a `T`.
///
/// `parent` is the compound the value was taken from, `None` at the root.
pub trait VPackDeserializer<T>: Send + Sync {
    fn deserialize(
        &self,
        parent: Option<&VPackSlice>,
        vpack: &VPackSlice,
        context: &DeserializationContext,
    ) -> Result<T>;
}

/// Adapts a function or closure to [`VPackDeserializer`].
pub struct FnDeserializer<F>(pub F);

impl<T, F> VPackDeserializer<T> for FnDeserializer<F>
where
    F: Fn(Option<&VPackSlice>, &VPackSlice, &DeserializationContext) -> Result<T> + Send + Sync,
{
    fn deserialize(
        &self,
        parent: Option<&VPackSlice>,
        vpack: &VPackSlice,
        context: &DeserializationContext,
    ) -> Result<T> {
        (self.0)(parent, vpack, context)
    }
}

impl<F> fmt::Debug for FnDeserializer<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str("FnDeserializer") }
}

type Converter<T> = Box<dyn VPackDeserializer<T>>;

/// Converters keyed by their target type.
///
/// Registration needs `&mut self`; lookups only read, so a registry that is no longer
/// being modified can be shared between threads.
pub struct DeserializerRegistry {
    converters: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

static GLOBAL: Lazy<DeserializerRegistry> = Lazy::new(DeserializerRegistry::new);

impl DeserializerRegistry {
    /// A registry without any converters.
    pub fn empty() -> DeserializerRegistry {
        DeserializerRegistry {
            converters: HashMap::new(),
        }
    }

    /// A registry holding the built-in converters.
    pub fn new() -> DeserializerRegistry {
        let mut registry = DeserializerRegistry::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// The process-wide registry of built-in converters, created on first use.
    pub fn global() -> &'static DeserializerRegistry { &GLOBAL }

    /// Installs `deserializer` for `T`, replacing any earlier one.
    pub fn register<T, D>(&mut self, deserializer: D) -> &mut DeserializerRegistry
    where
        T: 'static,
        D: VPackDeserializer<T> + 'static,
    {
        let boxed: Converter<T> = Box::new(deserializer);
        if self
            .converters
            .insert(TypeId::of::<T>(), Box::new(boxed))
            .is_some()
        {
            debug!("replaced deserializer for {}", type_name::<T>());
        } else {
            debug!("registered deserializer for {}", type_name::<T>());
        }
        self
    }

    /// Installs a function or closure as the converter for `T`.
    pub fn register_fn<T, F>(&mut self, f: F) -> &mut DeserializerRegistry
    where
        T: 'static,
        F: Fn(Option<&VPackSlice>, &VPackSlice, &DeserializationContext) -> Result<T>
            + Send
            + Sync
            + 'static,
    {
        self.register::<T, _>(FnDeserializer(f))
    }

    /// Whether a converter for `T` is installed.
    pub fn contains<T: 'static>(&self) -> bool { self.converters.contains_key(&TypeId::of::<T>()) }

    pub fn len(&self) -> usize { self.converters.len() }

    pub fn is_empty(&self) -> bool { self.converters.is_empty() }

    /// The converter for `T`, if any.
    pub fn lookup<T: 'static>(&self) -> Option<&dyn VPackDeserializer<T>> {
        self.converters
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<Converter<T>>())
            .map(|converter| converter.as_ref())
    }

    /// Converts a root slice into a `T`.
    ///
    /// # Errors
    ///
    /// [`VPackError::Unsupported`] if no converter for `T` is installed, otherwise whatever
    /// the converter reports.
    pub fn deserialize<T: 'static>(&self, vpack: &VPackSlice, options: &VPackOptions) -> Result<T> {
        DeserializationContext::new(self, options).deserialize(None, vpack)
    }
}

impl Default for DeserializerRegistry {
    fn default() -> DeserializerRegistry { DeserializerRegistry::new() }
}

impl fmt::Debug for DeserializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DeserializerRegistry")
            .field("converters", &self.converters.len())
            .finish()
    }
}

/// State shared by the converters of one deserialization call.
#[derive(Clone, Copy, Debug)]
pub struct DeserializationContext<'a> {
    registry: &'a DeserializerRegistry,
    options: &'a VPackOptions,
}

impl<'a> DeserializationContext<'a> {
    pub fn new(registry: &'a DeserializerRegistry, options: &'a VPackOptions) -> DeserializationContext<'a> {
        DeserializationContext { registry, options }
    }

    pub fn registry(&self) -> &'a DeserializerRegistry { self.registry }

    pub fn options(&self) -> &'a VPackOptions { self.options }

    /// Converts `vpack` with the converter registered for `T`.
    pub fn deserialize<T: 'static>(&self, parent: Option<&VPackSlice>, vpack: &VPackSlice) -> Result<T> {
        let converter = self.registry.lookup::<T>().ok_or_else(|| {
            VPackError::unsupported(format!("no deserializer registered for {}", type_name::<T>()))
        })?;
        converter.deserialize(parent, vpack, self)
    }

    /// Converts every member of an array, stopping at the first failure.
    pub fn deserialize_array<T: 'static>(&self, vpack: &VPackSlice) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(vpack.length()?);
        for member in vpack.array_iter()? {
            out.push(self.deserialize(Some(vpack), &member?)?);
        }
        Ok(out)
    }

    /// Converts every value of an object, keeping keys in storage order.
    pub fn deserialize_object<T: 'static>(&self, vpack: &VPackSlice) -> Result<Vec<(String, T)>> {
        let mut out = Vec::with_capacity(vpack.length()?);
        for entry in vpack.object_iter()? {
            let (key, value) = entry?;
            out.push((key.get_as_string()?, self.deserialize(Some(vpack), &value)?));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread};
    use test_log::test;

    fn slice(bytes: &[u8]) -> VPackSlice { VPackSlice::from_vec(bytes.to_vec()) }

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    struct PointDeserializer;

    impl VPackDeserializer<Point> for PointDeserializer {
        fn deserialize(
            &self,
            _: Option<&VPackSlice>,
            vpack: &VPackSlice,
            ctx: &DeserializationContext,
        ) -> Result<Point> {
            let field = |name| {
                vpack
                    .get(name)?
                    .ok_or_else(|| VPackError::parse("Point", format!("missing {}", name)))
            };
            Ok(Point {
                x: ctx.deserialize(Some(vpack), &field("x")?)?,
                y: ctx.deserialize(Some(vpack), &field("y")?)?,
            })
        }
    }

    // {"x": 1, "y": -2}
    const POINT: [u8; 9] = [0x14, 0x09, 0x41, 0x78, 0x31, 0x41, 0x79, 0x3e, 0x02];

    #[test]
    fn custom_converter() {
        let mut registry = DeserializerRegistry::new();
        registry.register::<Point, _>(PointDeserializer);
        assert!(registry.contains::<Point>());

        let p: Point = registry
            .deserialize(&slice(&POINT), &VPackOptions::default())
            .unwrap();
        assert_eq!(p, Point { x: 1, y: -2 });
    }

    #[test]
    fn missing_converter() {
        let registry = DeserializerRegistry::empty();
        assert!(registry.is_empty());
        match registry.deserialize::<bool>(&slice(&[0x1a]), &VPackOptions::default()) {
            Err(VPackError::Unsupported(msg)) => assert!(msg.contains("bool")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(DeserializerRegistry::global()
            .deserialize::<Point>(&slice(&POINT), &VPackOptions::default())
            .is_err());
    }

    #[test]
    fn registering_again_replaces() {
        let mut registry = DeserializerRegistry::new();
        let before = registry.len();
        registry.register_fn(|_, _: &VPackSlice, _| Ok(true));
        assert_eq!(registry.len(), before);

        let b: bool = registry
            .deserialize(&slice(&[0x19]), &VPackOptions::default())
            .unwrap();
        assert!(b);
    }

    #[test]
    fn parent_is_passed_down() {
        let mut registry = DeserializerRegistry::empty();
        registry.register_fn(|parent: Option<&VPackSlice>, v: &VPackSlice, _| {
            Ok((parent.map(VPackSlice::start), v.start()))
        });
        let ctx_options = VPackOptions::default();
        let ctx = DeserializationContext::new(&registry, &ctx_options);

        let array = slice(&[0x13, 0x05, 0x31, 0x32, 0x02]);
        let positions: Vec<(Option<usize>, usize)> = ctx.deserialize_array(&array).unwrap();
        assert_eq!(positions, vec![(Some(0), 2), (Some(0), 3)]);

        let root: (Option<usize>, usize) = ctx.deserialize(None, &array).unwrap();
        assert_eq!(root, (None, 0));
    }

    #[test]
    fn arrays_and_objects() {
        let registry = DeserializerRegistry::global();
        let options = VPackOptions::default();
        let ctx = DeserializationContext::new(registry, &options);

        let ints: Vec<i32> = ctx
            .deserialize_array(&slice(&[0x02, 0x05, 0x31, 0x32, 0x33]))
            .unwrap();
        assert_eq!(ints, vec![1, 2, 3]);

        let fields: Vec<(String, i64)> = ctx.deserialize_object(&slice(&POINT)).unwrap();
        assert_eq!(fields, vec![("x".to_string(), 1), ("y".to_string(), -2)]);

        // the first failing member aborts the whole conversion
        let mixed = slice(&[0x13, 0x06, 0x31, 0x41, 0x61, 0x02]);
        assert!(ctx.deserialize_array::<i64>(&mixed).is_err());
        assert!(ctx.deserialize_array::<i64>(&slice(&POINT)).is_err());
    }

    #[test]
    fn forged_count_is_rejected() {
        let options = VPackOptions::default();
        let ctx = DeserializationContext::new(DeserializerRegistry::global(), &options);

        let mut array = vec![0x13, 0x0c, 0x31, 0x10];
        array.extend_from_slice(&[0x80; 8]);
        match ctx.deserialize_array::<i64>(&slice(&array)) {
            Err(VPackError::MalformedEncoding { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }

        let object = [0x14, 0x06, 0x41, 0x61, 0x31, 0x7f];
        match ctx.deserialize_object::<i64>(&slice(&object)) {
            Err(VPackError::MalformedEncoding { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn shared_between_threads() {
        let buffer = slice(&[0x02, 0x05, 0x31, 0x32, 0x33]);
        let mut registry = DeserializerRegistry::new();
        registry.register::<Point, _>(PointDeserializer);
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let array = buffer.clone();
                thread::spawn(move || {
                    let options = VPackOptions::default();
                    DeserializationContext::new(&registry, &options)
                        .deserialize_array::<u8>(&array)
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec![1, 2, 3]);
        }
    }
}
