// src/models/snapshot.rs

use crate::models::{
    academic::{Course, Student},
    branch::Branch,
    finance::{Enrollment, Payment},
};

// ---
// Snapshot (A "Foto" dos dados)
// ---
// As coleções buscadas na API de origem para uma única passada de agregação.
// Somente leitura: nada aqui é alterado depois de carregado.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub branches: Vec<Branch>,
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
    pub payments: Vec<Payment>,
}

impl Snapshot {
    pub fn find_enrollment(&self, id: i64) -> Option<&Enrollment> {
        self.enrollments.iter().find(|e| e.id == id)
    }
}
