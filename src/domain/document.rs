//! XML codec for the student list
//!
//! Document shape:
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <students>
//!   <student>
//!     <name>...</name>
//!     <group>...</group>
//!     <grade>...</grade>
//!   </student>
//! </students>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::domain::entities::{parse_integer, Student};
use crate::domain::error::{DomainError, DomainResult};

const ROOT: &str = "students";
const STUDENT: &str = "student";

/// Leaf fields of a `student` element, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Name,
    Group,
    Grade,
}

impl Leaf {
    fn tag(self) -> &'static str {
        match self {
            Leaf::Name => "name",
            Leaf::Group => "group",
            Leaf::Grade => "grade",
        }
    }

    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"name" => Some(Leaf::Name),
            b"group" => Some(Leaf::Group),
            b"grade" => Some(Leaf::Grade),
            _ => None,
        }
    }
}

/// A `student` element being read; first occurrence of each leaf wins.
#[derive(Debug, Default)]
struct PendingStudent {
    name: Option<String>,
    group: Option<String>,
    grade: Option<String>,
}

impl PendingStudent {
    fn slot(&mut self, leaf: Leaf) -> &mut Option<String> {
        match leaf {
            Leaf::Name => &mut self.name,
            Leaf::Group => &mut self.group,
            Leaf::Grade => &mut self.grade,
        }
    }

    /// Claim a leaf for text collection. Returns false if it was already seen.
    fn open(&mut self, leaf: Leaf) -> bool {
        let slot = self.slot(leaf);
        if slot.is_some() {
            return false;
        }
        *slot = Some(String::new());
        true
    }

    fn finish(self) -> DomainResult<Student> {
        let name = self.name.ok_or_else(|| missing_leaf(Leaf::Name))?;
        let group = self.group.ok_or_else(|| missing_leaf(Leaf::Group))?;
        let grade = self.grade.ok_or_else(|| missing_leaf(Leaf::Grade))?;
        Ok(Student {
            name,
            group: parse_integer("group", &group)?,
            grade,
        })
    }
}

fn missing_leaf(leaf: Leaf) -> DomainError {
    DomainError::MalformedDocument(format!("<{STUDENT}> without <{}>", leaf.tag()))
}

fn malformed(e: impl std::fmt::Display) -> DomainError {
    DomainError::MalformedDocument(e.to_string())
}

fn encoding(e: impl std::fmt::Display) -> DomainError {
    DomainError::Encoding(e.to_string())
}

/// Encode students as an indented UTF-8 XML document.
///
/// The output depends only on the input, so saving an unchanged list
/// reproduces the same bytes.
pub fn serialize(students: &[Student]) -> DomainResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(encoding)?;

    if students.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(ROOT)))
            .map_err(encoding)?;
    } else {
        writer
            .write_event(Event::Start(BytesStart::new(ROOT)))
            .map_err(encoding)?;
        for student in students {
            writer
                .write_event(Event::Start(BytesStart::new(STUDENT)))
                .map_err(encoding)?;
            write_leaf(&mut writer, Leaf::Name, &student.name)?;
            write_leaf(&mut writer, Leaf::Group, &student.group.to_string())?;
            write_leaf(&mut writer, Leaf::Grade, &student.grade)?;
            writer
                .write_event(Event::End(BytesEnd::new(STUDENT)))
                .map_err(encoding)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(ROOT)))
            .map_err(encoding)?;
    }

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    debug!("serialize: {} students, {} bytes", students.len(), bytes.len());
    Ok(bytes)
}

fn write_leaf(writer: &mut Writer<Vec<u8>>, leaf: Leaf, text: &str) -> DomainResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(leaf.tag())))
        .map_err(encoding)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(encoding)?;
    writer
        .write_event(Event::End(BytesEnd::new(leaf.tag())))
        .map_err(encoding)?;
    Ok(())
}

/// Decode a student document.
///
/// Unknown elements and inter-element whitespace are ignored. Structural
/// problems are `MalformedDocument`; a non-integer group is `InvalidInteger`.
pub fn deserialize(bytes: &[u8]) -> DomainResult<Vec<Student>> {
    let content = std::str::from_utf8(bytes).map_err(malformed)?;
    let mut reader = Reader::from_str(content);

    let mut students = Vec::new();
    // Names of the currently open elements, outermost first
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut pending: Option<PendingStudent> = None;
    let mut active: Option<Leaf> = None;
    let mut seen_root = false;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                let tag = e.name().as_ref().to_vec();
                enter(&tag, open.len(), &mut seen_root, &mut pending, &mut active)?;
                open.push(tag);
            }
            Event::Empty(e) => {
                let name = e.name();
                let tag = name.as_ref();
                enter(tag, open.len(), &mut seen_root, &mut pending, &mut active)?;
                leave(tag, open.len(), &mut pending, &mut active, &mut students)?;
            }
            Event::End(_) => {
                let tag = open
                    .pop()
                    .ok_or_else(|| malformed("closing tag without opening tag"))?;
                leave(&tag, open.len(), &mut pending, &mut active, &mut students)?;
            }
            Event::Text(e) => {
                if let (Some(leaf), 3) = (active, open.len()) {
                    let text = e.unescape().map_err(malformed)?;
                    append_text(&mut pending, leaf, &text);
                }
            }
            Event::CData(e) => {
                if let (Some(leaf), 3) = (active, open.len()) {
                    let text = std::str::from_utf8(&e).map_err(malformed)?;
                    append_text(&mut pending, leaf, text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed(format!("missing <{ROOT}> root element")));
    }
    if !open.is_empty() {
        return Err(malformed("unexpected end of document"));
    }
    debug!("deserialize: {} students", students.len());
    Ok(students)
}

/// Handle an opening (or self-closing) tag at nesting `depth`.
fn enter(
    tag: &[u8],
    depth: usize,
    seen_root: &mut bool,
    pending: &mut Option<PendingStudent>,
    active: &mut Option<Leaf>,
) -> DomainResult<()> {
    match depth {
        0 => {
            if *seen_root {
                return Err(malformed("more than one root element"));
            }
            if tag != ROOT.as_bytes() {
                return Err(malformed(format!(
                    "expected <{ROOT}> root element, found <{}>",
                    String::from_utf8_lossy(tag)
                )));
            }
            *seen_root = true;
        }
        1 if tag == STUDENT.as_bytes() => *pending = Some(PendingStudent::default()),
        2 => {
            if let (Some(student), Some(leaf)) = (pending.as_mut(), Leaf::from_tag(tag)) {
                if student.open(leaf) {
                    *active = Some(leaf);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Handle a closing tag; `depth` is the nesting level after the element closed.
fn leave(
    tag: &[u8],
    depth: usize,
    pending: &mut Option<PendingStudent>,
    active: &mut Option<Leaf>,
    students: &mut Vec<Student>,
) -> DomainResult<()> {
    match depth {
        1 if tag == STUDENT.as_bytes() => {
            if let Some(student) = pending.take() {
                students.push(student.finish()?);
            }
        }
        2 => *active = None,
        _ => {}
    }
    Ok(())
}

fn append_text(pending: &mut Option<PendingStudent>, leaf: Leaf, text: &str) {
    if let Some(slot) = pending.as_mut().and_then(|p| p.slot(leaf).as_mut()) {
        slot.push_str(text);
    }
}
