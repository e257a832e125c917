//! A string-keyed map built from a sorted container.
//!
//! Run with:
//!   cargo run --example map
//!
//! Reads five `key value` pairs twice: once into a map kept in ascending
//! key order, once into one kept in descending order. A repeated key
//! replaces the stored value. A destruction hook reports every entry the
//! container releases.

use std::cmp::Ordering;
use std::io::{self, BufRead, Write};

use nexus_container::Container;

const COUNT: usize = 5;

#[derive(Debug)]
struct Entry {
    key: String,
    value: i64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Order {
    Ascending,
    Descending,
}

fn by_key(probe: &str, stored: &Entry) -> Ordering {
    probe.cmp(stored.key.as_str())
}

fn entry_order(new: &Entry, cur: &Entry) -> Ordering {
    new.key.cmp(&cur.key)
}

fn parse(line: &str) -> Option<Entry> {
    let (key, value) = line.trim().rsplit_once(char::is_whitespace)?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some(Entry {
        key: key.to_owned(),
        value: value.parse().ok()?,
    })
}

fn populate<I>(map: &mut Container<Entry>, lines: &mut I, order: Order) -> io::Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!("---------------------------------------------------");
    println!(
        "Enter {COUNT} `key value` pairs; keys are kept in {} order.",
        if order == Order::Ascending { "ASCENDING" } else { "DESCENDING" }
    );
    println!("---------------------------------------------------");

    let mut read = 0;
    while read < COUNT {
        print!("\nkey value: ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        read += 1;

        let Some(entry) = parse(&line) else {
            println!("skipping {:?}: expected `key value`", line.trim());
            continue;
        };

        let result = if map.peek_matching(entry.key.as_str(), by_key).is_some() {
            let key = entry.key.clone();
            map.replace_matching(key.as_str(), entry, by_key)
        } else if order == Order::Ascending {
            map.add_sorted_ascending(entry, entry_order)
        } else {
            map.add_sorted_descending(entry, entry_order)
        };

        if let Err(rejected) = result {
            println!("could not store {:?}: {}", rejected.value.key, rejected.error);
        }
    }
    Ok(())
}

fn print(map: &mut Container<Entry>) {
    println!("\n\n-------------------------------------------");
    println!("Total number of elements in the map = {}", map.len());
    println!("-------------------------------------------");

    println!("\nWithout removing:");
    for entry in map.iter() {
        println!("key:{}, value:{}", entry.key, entry.value);
    }

    println!("\nRemoving front to back:");
    while let Some(element) = map.get_front() {
        println!("key:{}, value:{}", element.key, element.value);
        map.delete_standalone(element);
    }
}

fn main() -> io::Result<()> {
    let mut map: Container<Entry> =
        Container::with_hook(|entry: &mut Entry| println!("  released {}", entry.key));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for order in [Order::Ascending, Order::Descending] {
        populate(&mut map, &mut lines, order)?;
        print(&mut map);
        println!();
    }

    map.delete_container();
    Ok(())
}
