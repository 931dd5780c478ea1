// TRAP text writer: `relation(#unit_slot,arg,...)`, one fact per line

use std::io::{self, Write};

use crate::extractors::base::{Fact, FactSink, Value};

pub struct TrapWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> TrapWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Facts written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render one fact as a TRAP line, without the newline.
pub fn format_fact(fact: &Fact) -> String {
    let mut line = format!("{}({}", fact.relation, fact.subject);
    for arg in &fact.args {
        line.push(',');
        match arg {
            Value::Handle(handle) => line.push_str(&handle.to_string()),
            Value::Int(i) => line.push_str(&i.to_string()),
            Value::Str(s) => {
                line.push('"');
                line.push_str(&s.replace('"', "\"\""));
                line.push('"');
            }
        }
    }
    line.push(')');
    line
}

impl<W: Write> FactSink for TrapWriter<W> {
    fn emit(&mut self, fact: Fact) -> io::Result<()> {
        writeln!(self.out, "{}", format_fact(&fact))?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{Handle, Relation, Role, UnitId};

    #[test]
    fn test_child_fact_line() {
        let parent = Handle::new(UnitId(3), 4);
        let child = Handle::new(UnitId(3), 5);
        let fact = Fact::new(
            parent,
            Relation::Child,
            vec![Role::OperandType.into(), child.into(), 0u32.into()],
        );
        assert_eq!(format_fact(&fact), "child(#3_5,\"operand_type\",#3_6,0)");
    }

    #[test]
    fn test_quotes_are_doubled() {
        let fact = Fact::new(
            Handle::new(UnitId(1), 0),
            Relation::Literal,
            vec![r#"say "hi""#.into()],
        );
        assert_eq!(format_fact(&fact), r#"literal(#1_1,"say ""hi""")"#);
    }

    #[test]
    fn test_writer_streams_lines_in_order() {
        let mut writer = TrapWriter::new(Vec::new());
        let subject = Handle::new(UnitId(1), 1);
        writer
            .emit(Fact::new(subject, Relation::Kind, vec!["Expression".into(), "SIZEOF".into()]))
            .unwrap();
        writer
            .emit(Fact::new(subject, Relation::ExprType, vec!["int".into()]))
            .unwrap();
        assert_eq!(writer.written(), 2);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "kind(#1_2,\"Expression\",\"SIZEOF\")\nexpr_type(#1_2,\"int\")\n"
        );
    }
}
