use randevu_reminders_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    for i in 0..collection.len() {
        if collection[i].id() == val.id() {
            collection.splice(i..i + 1, vec![val.clone()]);
        }
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    for item in collection.iter() {
        if item.id() == val_id {
            return Some(item.clone());
        }
    }
    None
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    let mut items = Vec::new();
    for item in collection.iter() {
        if compare(item) {
            items.push(item.clone());
        }
    }
    items
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = collection.lock().unwrap();
    for i in 0..collection.len() {
        if collection[i].id() == val_id {
            let deleted_val = collection.remove(i);
            return Some(deleted_val);
        }
    }
    None
}

/// Applies `update` to the item with the given id while the collection lock
/// is held, which makes the read-then-write atomic.
pub fn update_one<T: Clone + Entity, U: FnOnce(&mut T)>(
    val_id: &ID,
    collection: &Mutex<Vec<T>>,
    update: U,
) -> Option<T> {
    let mut collection = collection.lock().unwrap();
    match collection.iter_mut().find(|item| item.id() == val_id) {
        Some(item) => {
            update(item);
            Some(item.clone())
        }
        None => None,
    }
}
