use crate::model::{PackResult, Placement};
use serde_json::{Value, json};
use std::collections::HashSet;

/// Sprite names for `placed`, in order: `prefix + key`, with `_1`, `_2`, ...
/// appended when a name has already been handed out.
pub fn unique_sprite_names<K: ToString>(placed: &[Placement<K>], prefix: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(placed.len());
    let mut names = Vec::with_capacity(placed.len());
    for p in placed {
        let base = format!("{}{}", prefix, p.key.to_string());
        let mut name = base.clone();
        let mut index = 1;
        while seen.contains(&name) {
            name = format!("{}_{}", base, index);
            index += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

fn meta<K>(result: &PackResult<K>) -> Value {
    json!({
        "app": "sprite-packer",
        "version": env!("CARGO_PKG_VERSION"),
        "size": {"w": result.canvas_width, "h": result.canvas_height},
        "spacing": result.spacing,
        "algorithm": result.algorithm,
        "fillRatio": result.fill_ratio(),
    })
}

fn frame_value<K>(p: &Placement<K>) -> Value {
    let frame = json!({"x": p.frame.x, "y": p.frame.y, "w": p.frame.w, "h": p.frame.h});
    let footprint = json!({"x": p.footprint.x, "y": p.footprint.y, "w": p.footprint.w, "h": p.footprint.h});
    json!({
        "frame": frame,
        "footprint": footprint,
        "sourceSize": {"w": p.frame.w, "h": p.frame.h},
        "pivot": {"x": 0.5, "y": 0.5},
    })
}

fn unplaced_values<K: ToString>(result: &PackResult<K>) -> Vec<Value> {
    result
        .unplaced
        .iter()
        .map(|u| {
            json!({
                "key": u.item.key.to_string(),
                "w": u.item.w,
                "h": u.item.h,
                "reason": u.reason,
            })
        })
        .collect()
}

/// Serialize a result as `{ frames: [...], unplaced: [...], meta }`.
/// Each frame carries its (unique, prefixed) `name` and original `key`.
pub fn to_json_array<K: ToString>(result: &PackResult<K>, prefix: &str) -> Value {
    let names = unique_sprite_names(&result.placed, prefix);
    let frames: Vec<Value> = result
        .placed
        .iter()
        .zip(names)
        .map(|(p, name)| {
            let mut v = frame_value(p);
            v["name"] = Value::String(name);
            v["key"] = Value::String(p.key.to_string());
            v
        })
        .collect();
    json!({
        "frames": frames,
        "unplaced": unplaced_values(result),
        "meta": meta(result),
    })
}

/// Serialize a result with frames keyed by sprite name.
/// Shape: `{ frames: { name: { frame, footprint, sourceSize, pivot } }, unplaced, meta }`.
pub fn to_json_hash<K: ToString>(result: &PackResult<K>, prefix: &str) -> Value {
    let names = unique_sprite_names(&result.placed, prefix);
    let mut frames = serde_json::Map::new();
    for (p, name) in result.placed.iter().zip(names) {
        frames.insert(name, frame_value(p));
    }
    json!({
        "frames": frames,
        "unplaced": unplaced_values(result),
        "meta": meta(result),
    })
}
