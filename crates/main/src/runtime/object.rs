////////////////////////////////////////////////////////////////////////////////
// This file is part of "Ad Astra", an embeddable scripting programming       //
// language platform.                                                         //
//                                                                            //
// This work is proprietary software with source-available code.              //
//                                                                            //
// To copy, use, distribute, or contribute to this work, you must agree to    //
// the terms of the General License Agreement:                                //
//                                                                            //
// https://github.com/Eliah-Lakhin/ad-astra/blob/master/EULA.md               //
//                                                                            //
// The agreement grants a Basic Commercial License, allowing you to use       //
// this work in non-commercial and limited commercial products with a total   //
// gross revenue cap. To remove this commercial limit for one of your         //
// products, you must acquire a Full Commercial License.                      //
//                                                                            //
// If you contribute to the source code, documentation, or related materials, //
// you must grant me an exclusive license to these contributions.             //
// Contributions are governed by the "Contributions" section of the General   //
// License Agreement.                                                         //
//                                                                            //
// Copying the work in parts is strictly forbidden, except as permitted       //
// under the General License Agreement.                                       //
//                                                                            //
// If you do not or cannot agree to the terms of this Agreement,              //
// do not use this work.                                                      //
//                                                                            //
// This work is provided "as is", without any warranties, express or implied, //
// except where such disclaimers are legally invalid.                         //
//                                                                            //
// Copyright (c) 2024 Ilya Lakhin (Илья Александрович Лахин).                 //
// All rights reserved.                                                       //
////////////////////////////////////////////////////////////////////////////////

use std::{
    any::Any,
    cell::RefCell,
    fmt::{Debug, Display, Formatter},
};

use crate::{
    report::system_panic,
    runtime::{ClassId, HandlerTable, Value},
};

/// A handle of an object owned by the [Runtime](crate::runtime::Runtime).
///
/// The handle is a plain copyable identifier. The object's lifetime is
/// governed by the host reference count (see
/// [Runtime::add_ref](crate::runtime::Runtime::add_ref) and
/// [Runtime::release](crate::runtime::Runtime::release)), not by the number
/// of ObjectRef copies.
///
/// Once the object is destroyed, the handle becomes stale: its slot may be
/// reused by another object, but the stale handle never resolves to the new
/// one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectRef {
    index: u32,
    generation: u32,
}

impl Debug for ObjectRef {
    #[inline]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!(
            "ObjectRef(#{}.{})",
            self.index, self.generation
        ))
    }
}

impl Display for ObjectRef {
    #[inline]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!("#{}", self.index))
    }
}

impl ObjectRef {
    /// Returns the slot number of the object within the runtime's object
    /// store.
    #[inline(always)]
    pub fn index(self) -> u32 {
        self.index
    }
}

/// The host bookkeeping of an object that precedes the native payload in
/// the object's allocation.
pub struct ObjectHeader {
    id: ObjectRef,
    class: ClassId,
    handlers: &'static HandlerTable,
    ref_count: usize,
    properties: Vec<Value>,
}

impl Debug for ObjectHeader {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ObjectHeader")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("handlers", &self.handlers.type_name())
            .field("ref_count", &self.ref_count)
            .field("properties", &self.properties)
            .finish()
    }
}

impl ObjectHeader {
    #[inline(always)]
    pub(crate) fn new(
        id: ObjectRef,
        class: ClassId,
        handlers: &'static HandlerTable,
        properties: Vec<Value>,
    ) -> Self {
        Self {
            id,
            class,
            handlers,
            ref_count: 1,
            properties,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> ObjectRef {
        self.id
    }

    #[inline(always)]
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// The handler table the object is bound to.
    ///
    /// For the instances of the adapted native types this is the type's own
    /// table. Objects that have no native payload are bound to the
    /// [standard](crate::runtime::STANDARD_HANDLERS) table.
    #[inline(always)]
    pub fn handlers(&self) -> &'static HandlerTable {
        self.handlers
    }

    #[inline(always)]
    pub fn ref_count(&self) -> usize {
        self.ref_count
    }

    #[inline(always)]
    pub fn properties(&self) -> &[Value] {
        &self.properties
    }

    #[inline(always)]
    pub(crate) fn properties_mut(&mut self) -> &mut Vec<Value> {
        &mut self.properties
    }

    #[inline(always)]
    pub(crate) fn retain(&mut self) -> usize {
        self.ref_count += 1;
        self.ref_count
    }

    #[inline(always)]
    pub(crate) fn unretain(&mut self) -> usize {
        self.ref_count = self.ref_count.saturating_sub(1);
        self.ref_count
    }
}

/// A single allocation of an object: the host header immediately followed
/// by the native payload of type `T`.
///
/// The payload slot is empty for the objects whose construction has been
/// refused; such objects are never observed as instances of `T`.
pub struct ObjectBlock<T: 'static> {
    header: ObjectHeader,
    payload: RefCell<Option<T>>,
}

impl<T: 'static> ObjectBlock<T> {
    #[inline(always)]
    pub(crate) fn new(header: ObjectHeader, payload: Option<T>) -> Self {
        Self {
            header,
            payload: RefCell::new(payload),
        }
    }

    #[inline(always)]
    pub(crate) fn payload(&self) -> &RefCell<Option<T>> {
        &self.payload
    }
}

/// A type-erased interface of the [ObjectBlock].
pub trait Block: 'static {
    fn header(&self) -> &ObjectHeader;

    fn header_mut(&mut self) -> &mut ObjectHeader;

    fn as_any(&self) -> &dyn Any;

    /// Drops the payload in place.
    ///
    /// Returns false if there was no payload to drop. Repeated calls are
    /// no-ops.
    fn destruct(&mut self) -> bool;
}

impl<T: 'static> Block for ObjectBlock<T> {
    #[inline(always)]
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    #[inline(always)]
    fn header_mut(&mut self) -> &mut ObjectHeader {
        &mut self.header
    }

    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn destruct(&mut self) -> bool {
        self.payload.get_mut().take().is_some()
    }
}

/// An owned object allocation.
pub type ObjectBox = Box<dyn Block>;

struct Slot {
    generation: u32,
    block: Option<ObjectBox>,
}

/// An arena of the object allocations with free slot reuse.
pub(crate) struct ObjectStore {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
    live: usize,
}

impl ObjectStore {
    #[inline(always)]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Stores a new block built by the `build` function from the handle the
    /// block will be reachable by.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(ObjectRef) -> ObjectBox) -> ObjectRef {
        let id = match self.vacant.pop() {
            Some(index) => ObjectRef {
                index,
                generation: self.slots[index as usize].generation,
            },

            None => {
                let Ok(index) = u32::try_from(self.slots.len()) else {
                    system_panic!("Object store capacity exceeded.");
                };

                self.slots.push(Slot {
                    generation: 0,
                    block: None,
                });

                ObjectRef {
                    index,
                    generation: 0,
                }
            }
        };

        self.slots[id.index as usize].block = Some(build(id));
        self.live += 1;

        id
    }

    #[inline]
    pub(crate) fn get(&self, id: ObjectRef) -> Option<&dyn Block> {
        let slot = self.slots.get(id.index as usize)?;

        if slot.generation != id.generation {
            return None;
        }

        slot.block.as_deref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ObjectRef) -> Option<&mut (dyn Block + 'static)> {
        let slot = self.slots.get_mut(id.index as usize)?;

        if slot.generation != id.generation {
            return None;
        }

        slot.block.as_deref_mut()
    }

    /// Detaches the block from the store and invalidates all handles of the
    /// object.
    pub(crate) fn remove(&mut self, id: ObjectRef) -> Option<ObjectBox> {
        let slot = self.slots.get_mut(id.index as usize)?;

        if slot.generation != id.generation {
            return None;
        }

        let block = slot.block.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index);
        self.live -= 1;

        Some(block)
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn ids(&self) -> Vec<ObjectRef> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.block.is_some())
            .map(|(index, slot)| ObjectRef {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{
        object::{Block, ObjectBlock, ObjectHeader, ObjectStore},
        ClassId,
        ObjectRef,
        STANDARD_HANDLERS,
    };

    #[test]
    fn test_slot_reuse_invalidates_handles() {
        let mut store = ObjectStore::with_capacity(0);

        let first = store.insert_with(|id| {
            Box::new(ObjectBlock::<()>::new(
                ObjectHeader::new(id, ClassId::from_index(0), &STANDARD_HANDLERS, Vec::new()),
                None,
            ))
        });

        assert!(store.get(first).is_some());
        assert!(store.remove(first).is_some());
        assert!(store.get(first).is_none());
        assert!(store.remove(first).is_none());

        let second = store.insert_with(|id| {
            Box::new(ObjectBlock::new(
                ObjectHeader::new(id, ClassId::from_index(0), &STANDARD_HANDLERS, Vec::new()),
                Some(10u8),
            ))
        });

        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert!(store.get(first).is_none());
        assert_eq!(1, store.len());
        assert_eq!(vec![second], store.ids());
    }

    #[test]
    fn test_destruct_once() {
        let mut block = ObjectBlock::new(
            ObjectHeader::new(
                ObjectRef {
                    index: 0,
                    generation: 0,
                },
                ClassId::from_index(0),
                &STANDARD_HANDLERS,
                Vec::new(),
            ),
            Some(String::from("payload")),
        );

        assert!(block.destruct());
        assert!(block.payload().borrow().is_none());
        assert!(!block.destruct());
    }
}
