// src/services/listing.rs

use std::{cmp::Ordering, collections::HashMap};

use rust_decimal::Decimal;

use crate::{
    models::{
        academic::{Course, Student},
        listing::{
            CourseCriteria, EnrollmentCriteria, EnrollmentRow, EnrollmentSortField, Page,
            PaymentCriteria, PaymentProgressFilter, PaymentRow, PaymentSortField, SortOrder,
            StudentCriteria, DEFAULT_PER_PAGE,
        },
        finance::Enrollment,
        reports::UNKNOWN_LABEL,
        snapshot::Snapshot,
    },
    services::aggregation::compute_enrollment_progress,
};

// Busca normalizada: sem espaços nas pontas, minúscula, vazia = sem filtro
fn needle(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

// Índices por id montados uma vez por listagem
struct Labels<'a> {
    students: HashMap<i64, &'a Student>,
    courses: HashMap<i64, &'a Course>,
    enrollments: HashMap<i64, &'a Enrollment>,
}

impl<'a> Labels<'a> {
    fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            students: snapshot.students.iter().map(|s| (s.id, s)).collect(),
            courses: snapshot.courses.iter().map(|c| (c.id, c)).collect(),
            enrollments: snapshot.enrollments.iter().map(|e| (e.id, e)).collect(),
        }
    }

    fn student_name(&self, student_id: i64) -> String {
        self.students
            .get(&student_id)
            .map(|s| s.full_name())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    fn course_name(&self, course_id: i64) -> String {
        self.courses
            .get(&course_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    /// Rótulo "Nome Sobrenome - Curso" de uma matrícula.
    fn enrollment_label(&self, enrollment_id: i64) -> String {
        match self.enrollments.get(&enrollment_id) {
            Some(e) => format!(
                "{} - {}",
                self.student_name(e.student_id),
                self.course_name(e.course_id)
            ),
            None => UNKNOWN_LABEL.to_string(),
        }
    }
}

fn matches_payment_progress(enrollment: &Enrollment, filter: PaymentProgressFilter) -> bool {
    let paid = enrollment.paid_amount;
    let total = enrollment.total_amount;
    match filter {
        PaymentProgressFilter::All => true,
        PaymentProgressFilter::Paid => paid >= total,
        PaymentProgressFilter::Partial => paid > Decimal::ZERO && paid < total,
        PaymentProgressFilter::Pending => paid.is_zero(),
    }
}

pub fn filter_students(students: &[Student], criteria: &StudentCriteria) -> Vec<Student> {
    let search = needle(&criteria.search);
    students
        .iter()
        .filter(|s| criteria.status.matches(s.active))
        .filter(|s| match &search {
            Some(term) => {
                contains(&s.first_name, term)
                    || contains(&s.last_name, term)
                    || contains(&s.document_number, term)
            }
            None => true,
        })
        .cloned()
        .collect()
}

pub fn filter_courses(courses: &[Course], criteria: &CourseCriteria) -> Vec<Course> {
    let search = needle(&criteria.search);
    courses
        .iter()
        .filter(|c| criteria.status.matches(c.active))
        .filter(|c| search.as_deref().is_none_or(|term| contains(&c.name, term)))
        .cloned()
        .collect()
}

pub fn filter_enrollments(snapshot: &Snapshot, criteria: &EnrollmentCriteria) -> Vec<EnrollmentRow> {
    let search = needle(&criteria.search);
    let labels = Labels::new(snapshot);

    let mut rows: Vec<EnrollmentRow> = snapshot
        .enrollments
        .iter()
        .filter(|e| criteria.course_id.is_none_or(|id| e.course_id == id))
        .filter(|e| criteria.status.matches(e.active))
        .filter(|e| matches_payment_progress(e, criteria.payment_status))
        .map(|e| EnrollmentRow {
            enrollment: e.clone(),
            student_name: labels.student_name(e.student_id),
            course_name: labels.course_name(e.course_id),
            progress: compute_enrollment_progress(e),
        })
        .filter(|row| {
            search
                .as_deref()
                .is_none_or(|term| contains(&row.student_name, term))
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match criteria.sort_field {
            EnrollmentSortField::EnrollmentDate => {
                a.enrollment.enrollment_date.cmp(&b.enrollment.enrollment_date)
            }
            EnrollmentSortField::TotalAmount => {
                a.enrollment.total_amount.cmp(&b.enrollment.total_amount)
            }
            EnrollmentSortField::Progress => a.progress.percent.cmp(&b.progress.percent),
        };
        directed(ordering, criteria.sort_order)
    });

    rows
}

pub fn filter_payments(snapshot: &Snapshot, criteria: &PaymentCriteria) -> Vec<PaymentRow> {
    let search = needle(&criteria.search);
    let labels = Labels::new(snapshot);
    let method = criteria
        .method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let mut rows: Vec<PaymentRow> = snapshot
        .payments
        .iter()
        .filter(|p| criteria.payment_type.is_none_or(|t| p.payment_type == t))
        .filter(|p| criteria.status.is_none_or(|s| p.status == s))
        .filter(|p| method.is_none_or(|m| p.payment_method_name == m))
        .map(|p| PaymentRow {
            payment: p.clone(),
            enrollment_label: labels.enrollment_label(p.enrollment_id),
        })
        .filter(|row| {
            search
                .as_deref()
                .is_none_or(|term| contains(&row.enrollment_label, term))
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match criteria.sort_field {
            PaymentSortField::PaymentDate => a.payment.payment_date.cmp(&b.payment.payment_date),
            PaymentSortField::Amount => a.payment.amount.cmp(&b.payment.amount),
        };
        directed(ordering, criteria.sort_order)
    });

    rows
}

/// Fatia uma lista já filtrada. `page` começa em 1; `per_page` zero usa o padrão.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        total,
        page,
        per_page,
        total_pages,
    }
}
