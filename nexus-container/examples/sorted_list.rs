//! Keeps integers read from stdin in descending order, then drains them.
//!
//! Run with:
//!   cargo run --example sorted_list
//!
//! Enter up to five integers, one per line. Lines that do not parse are
//! skipped.

use std::io::{self, BufRead, Write};

use nexus_container::Container;

const COUNT: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut list: Container<i64> = Container::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("---------------------------------------------------");
    println!("Enter {COUNT} integers; they are kept in DESCENDING order.");
    println!("---------------------------------------------------");

    while list.len() < COUNT {
        print!("\ninteger: ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        match line.trim().parse::<i64>() {
            Ok(value) => list.add_sorted_descending(value, |new, cur| new.cmp(cur))?,
            Err(err) => println!("skipping {:?}: {err}", line.trim()),
        }
    }

    println!("\n\nTotal number of elements in the list = {}\n", list.len());
    println!("------------------------------");
    println!("Values, front to back:");
    println!("------------------------------");

    while let Some(element) = list.get_front() {
        println!("{}", element.data());
        list.delete_standalone(element);
    }

    list.delete_container();
    Ok(())
}
