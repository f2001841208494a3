use std::io;
use roxmltree::{Document, Node};
use serde::Serialize;
use crate::models::{Assignment, Course, Gradebook, Mark};

// Value written into the assignment columns of a mark that has no assignments.
pub const PLACEHOLDER: &str = "N/A";

pub const HEADER: [&str; 14] = [
    "Quarter", "Course Title", "Room", "Teacher", "Period", "Overall Score",
    "Mark", "Assignment", "Type", "Date Assigned", "Date Due", "Score",
    "Points", "Notes",
];

// Parses the gradebook XML returned for one reporting period.
// Marks and assignments are collected from anywhere below their parent, in document order.
pub fn parse_gradebook(xml: &str) -> Result<Gradebook, roxmltree::Error> {
    let document = Document::parse(xml)?;
    let courses = descendants_named(document.root(), "Course")
        .map(|course| Course {
            title: attr(course, "Title"),
            room: attr(course, "Room"),
            staff: attr(course, "Staff"),
            period: attr(course, "Period"),
            marks: descendants_named(course, "Mark").map(parse_mark).collect(),
        })
        .collect();

    Ok(Gradebook { courses })
}

fn parse_mark(mark: Node) -> Mark {
    Mark {
        name: attr(mark, "MarkName"),
        calculated_score: attr(mark, "CalculatedScoreString"),
        assignments: descendants_named(mark, "Assignment")
            .map(|assignment| Assignment {
                measure: attr(assignment, "Measure"),
                kind: attr(assignment, "Type"),
                date: attr(assignment, "Date"),
                due_date: attr(assignment, "DueDate"),
                score: attr(assignment, "Score"),
                points: attr(assignment, "Points"),
                notes: attr(assignment, "Notes"),
            })
            .collect(),
    }
}

// Strict descendants only, so a node never matches itself.
fn descendants_named<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'static str) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn attr(node: Node, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

// One CSV line. Field order matches HEADER; `None` is written as an empty field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRow<'a> {
    pub quarter: Option<&'a str>,
    pub course_title: Option<&'a str>,
    pub room: Option<&'a str>,
    pub teacher: Option<&'a str>,
    pub period: Option<&'a str>,
    pub overall_score: Option<&'a str>,
    pub mark: Option<&'a str>,
    pub assignment: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub date_assigned: Option<&'a str>,
    pub date_due: Option<&'a str>,
    pub score: Option<&'a str>,
    pub points: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl<'a> GradeRow<'a> {
    fn placeholder(course: &'a Course, mark: &'a Mark) -> Self {
        let na = Some(PLACEHOLDER);
        Self::with_assignment(course, mark, [na; 7])
    }

    fn assignment(course: &'a Course, mark: &'a Mark, assignment: &'a Assignment) -> Self {
        Self::with_assignment(course, mark, [
            assignment.measure.as_deref(),
            assignment.kind.as_deref(),
            assignment.date.as_deref(),
            assignment.due_date.as_deref(),
            assignment.score.as_deref(),
            assignment.points.as_deref(),
            assignment.notes.as_deref(),
        ])
    }

    fn with_assignment(course: &'a Course, mark: &'a Mark, fields: [Option<&'a str>; 7]) -> Self {
        let [assignment, kind, date_assigned, date_due, score, points, notes] = fields;
        Self {
            quarter: mark.name.as_deref(),
            course_title: course.title.as_deref(),
            room: course.room.as_deref(),
            teacher: course.staff.as_deref(),
            period: course.period.as_deref(),
            overall_score: mark.calculated_score.as_deref(),
            mark: mark.name.as_deref(),
            assignment,
            kind,
            date_assigned,
            date_due,
            score,
            points,
            notes,
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> [&'a str; 14] {
        [
            self.quarter, self.course_title, self.room, self.teacher, self.period,
            self.overall_score, self.mark, self.assignment, self.kind,
            self.date_assigned, self.date_due, self.score, self.points, self.notes,
        ]
        .map(|field| field.unwrap_or(""))
    }
}

// Flattens a gradebook into rows: one per assignment, or a single placeholder row for an empty mark.
pub fn rows(gradebook: &Gradebook) -> impl Iterator<Item = GradeRow<'_>> {
    gradebook.courses.iter().flat_map(|course| {
        course.marks.iter().flat_map(move |mark| {
            let placeholder = mark
                .assignments
                .is_empty()
                .then(|| GradeRow::placeholder(course, mark));
            placeholder.into_iter().chain(
                mark.assignments
                    .iter()
                    .map(move |assignment| GradeRow::assignment(course, mark, assignment)),
            )
        })
    })
}

// Appends every row of the gradebook to the writer and returns how many were written.
pub fn write_rows<W: io::Write>(writer: &mut csv::Writer<W>, gradebook: &Gradebook) -> csv::Result<usize> {
    let mut written = 0;
    for row in rows(gradebook) {
        writer.serialize(&row)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALGEBRA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Gradebook>
  <Courses>
    <Course Period="3" Title="Algebra" Room="12" Staff="Smith">
      <Marks>
        <Mark MarkName="Q1" CalculatedScoreString="95%">
          <Assignments>
            <Assignment Measure="HW1" Type="Homework" Date="9/5/2025" DueDate="9/6/2025" Score="10/10" Points="10" Notes="" />
          </Assignments>
        </Mark>
      </Marks>
    </Course>
  </Courses>
</Gradebook>"#;

    fn to_csv(gradebook: &Gradebook) -> String {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        write_rows(&mut writer, gradebook).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn single_assignment_flattens_to_one_row() {
        let gradebook = parse_gradebook(ALGEBRA).unwrap();
        let rows: Vec<_> = rows(&gradebook).map(|row| row.fields()).collect();
        assert_eq!(rows, vec![[
            "Q1", "Algebra", "12", "Smith", "3", "95%", "Q1", "HW1", "Homework",
            "9/5/2025", "9/6/2025", "10/10", "10", "",
        ]]);
        assert_eq!(to_csv(&gradebook), "Q1,Algebra,12,Smith,3,95%,Q1,HW1,Homework,9/5/2025,9/6/2025,10/10,10,\n");
    }

    #[test]
    fn mark_without_assignments_gets_placeholder_row() {
        let xml = r#"<Gradebook><Courses>
            <Course Title="Biology" Room="201" Staff="Jones" Period="1">
              <Marks><Mark MarkName="Q2" CalculatedScoreString="Not Graded"><Assignments /></Mark></Marks>
            </Course>
        </Courses></Gradebook>"#;
        let gradebook = parse_gradebook(xml).unwrap();
        let rows: Vec<_> = rows(&gradebook).collect();
        assert_eq!(rows.len(), 1);
        let fields = rows[0].fields();
        assert_eq!(&fields[..7], &["Q2", "Biology", "201", "Jones", "1", "Not Graded", "Q2"]);
        assert!(fields[7..].iter().all(|field| *field == PLACEHOLDER));
    }

    #[test]
    fn assignments_share_course_and_mark_fields() {
        let xml = r#"<Gradebook><Courses>
            <Course Title="Chemistry" Room="5" Staff="Lee" Period="2">
              <Marks><Mark MarkName="Q1" CalculatedScoreString="88%"><Assignments>
                <Assignment Measure="Lab 1" Type="Lab" Score="9/10" Points="10" />
                <Assignment Measure="Quiz 1" Type="Quiz" Score="18/20" Points="20" />
                <Assignment Measure="Test 1" Type="Test" Score="40/50" Points="50" />
              </Assignments></Mark></Marks>
            </Course>
        </Courses></Gradebook>"#;
        let gradebook = parse_gradebook(xml).unwrap();
        let rows: Vec<_> = rows(&gradebook).map(|row| row.fields()).collect();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(&row[..7], &["Q1", "Chemistry", "5", "Lee", "2", "88%", "Q1"]);
        }
        let measures: Vec<_> = rows.iter().map(|row| row[7]).collect();
        assert_eq!(measures, vec!["Lab 1", "Quiz 1", "Test 1"]);
    }

    #[test]
    fn rows_follow_document_order_across_courses_and_marks() {
        let xml = r#"<Gradebook><Courses>
            <Course Title="A"><Marks>
              <Mark MarkName="Q1"><Assignments><Assignment Measure="a1" /></Assignments></Mark>
              <Mark MarkName="Q2" />
            </Marks></Course>
            <Course Title="B"><Marks>
              <Mark MarkName="Q1"><Assignments><Assignment Measure="b1" /><Assignment Measure="b2" /></Assignments></Mark>
            </Marks></Course>
        </Courses></Gradebook>"#;
        let gradebook = parse_gradebook(xml).unwrap();
        let order: Vec<_> = rows(&gradebook).map(|row| (row.course_title, row.mark, row.assignment)).collect();
        assert_eq!(order, vec![
            (Some("A"), Some("Q1"), Some("a1")),
            (Some("A"), Some("Q2"), Some(PLACEHOLDER)),
            (Some("B"), Some("Q1"), Some("b1")),
            (Some("B"), Some("Q1"), Some("b2")),
        ]);
    }

    #[test]
    fn missing_attributes_are_blank() {
        let xml = r#"<Gradebook><Course><Mark><Assignment /></Mark></Course></Gradebook>"#;
        let gradebook = parse_gradebook(xml).unwrap();
        let row = rows(&gradebook).next().unwrap();
        assert_eq!(row.course_title, None);
        assert_eq!(row.fields(), [""; 14]);
        assert_eq!(to_csv(&gradebook), ",,,,,,,,,,,,,\n");
    }

    #[test]
    fn course_without_marks_produces_nothing() {
        let gradebook = parse_gradebook(r#"<Gradebook><Courses><Course Title="Empty" /></Courses></Gradebook>"#).unwrap();
        assert_eq!(gradebook.courses.len(), 1);
        assert_eq!(rows(&gradebook).count(), 0);
    }

    #[test]
    fn entities_in_attributes_are_decoded() {
        let xml = r#"<Gradebook><Course Title="AP Lit &amp; Comp" Staff="O&apos;Brien"><Mark MarkName="Q1" /></Course></Gradebook>"#;
        let gradebook = parse_gradebook(xml).unwrap();
        assert_eq!(gradebook.courses[0].title.as_deref(), Some("AP Lit & Comp"));
        assert_eq!(gradebook.courses[0].staff.as_deref(), Some("O'Brien"));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        assert!(parse_gradebook("<Gradebook><Course>").is_err());
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let gradebook = Gradebook {
            courses: vec![Course {
                title: Some("Art, Studio".into()),
                marks: vec![Mark {
                    name: Some("Q1".into()),
                    assignments: vec![Assignment { notes: Some("late, excused".into()), ..Default::default() }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        assert_eq!(to_csv(&gradebook), "Q1,\"Art, Studio\",,,,,Q1,,,,,,,\"late, excused\"\n");
    }
}
