// JSON Lines writer: one object per fact
//
// Handles are written as their `#unit_slot` text so they never collide with
// integer arguments.

use serde::Serialize;
use serde_json::Value as Json;
use std::io::{self, Write};

use crate::extractors::base::{Fact, FactSink, Value};

#[derive(Serialize)]
struct Record<'a> {
    relation: &'a str,
    subject: String,
    args: Vec<Json>,
}

pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn to_record(fact: &Fact) -> Record<'_> {
    let args = fact
        .args
        .iter()
        .map(|arg| match arg {
            Value::Handle(handle) => Json::String(handle.to_string()),
            Value::Int(i) => Json::from(*i),
            Value::Str(s) => Json::String(s.clone()),
        })
        .collect();
    Record {
        relation: fact.relation.as_str(),
        subject: fact.subject.to_string(),
        args,
    }
}

impl<W: Write> FactSink for JsonLinesWriter<W> {
    fn emit(&mut self, fact: Fact) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &to_record(&fact))?;
        self.out.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
