//! Directory service - student and teacher record keeping

use std::sync::Arc;

use semester_domain::{
    NewStudent, NewTeacher, Page, PersonFilter, Result, SemesterError, Student, StudentUpdate,
    Teacher, TeacherUpdate,
};
use tracing::{info, instrument};

use super::ports::{StudentRepository, TeacherRepository};

/// Directory service
///
/// Plain CRUD over students and teachers. Uniqueness (email) is enforced by
/// the store and surfaces as `Conflict`.
pub struct DirectoryService {
    students: Arc<dyn StudentRepository>,
    teachers: Arc<dyn TeacherRepository>,
}

impl DirectoryService {
    /// Create a new directory service
    pub fn new(students: Arc<dyn StudentRepository>, teachers: Arc<dyn TeacherRepository>) -> Self {
        Self { students, teachers }
    }

    /// Register a new student
    #[instrument(skip(self, student), fields(email = %student.email))]
    pub async fn add_student(&self, student: NewStudent) -> Result<Student> {
        let student = self.students.insert(student).await?;
        info!(student_id = student.id, "student registered");
        Ok(student)
    }

    /// Load one student
    pub async fn get_student(&self, id: i64) -> Result<Student> {
        self.students
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("student id {id}")))
    }

    /// Apply a partial update to a student
    #[instrument(skip(self, update))]
    pub async fn update_student(&self, id: i64, update: StudentUpdate) -> Result<Student> {
        if !self.students.update(id, update).await? {
            return Err(SemesterError::NotFound(format!("student id {id}")));
        }
        self.get_student(id).await
    }

    /// Remove a student record
    #[instrument(skip(self))]
    pub async fn delete_student(&self, id: i64) -> Result<()> {
        if !self.students.delete(id).await? {
            return Err(SemesterError::NotFound(format!("student id {id}")));
        }
        info!(student_id = id, "student deleted");
        Ok(())
    }

    /// List students, filtered and paginated
    pub async fn list_students(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Student>> {
        self.students.list(filter, page).await
    }

    /// Register a new teacher
    #[instrument(skip(self, teacher), fields(email = %teacher.email))]
    pub async fn add_teacher(&self, teacher: NewTeacher) -> Result<Teacher> {
        let teacher = self.teachers.insert(teacher).await?;
        info!(teacher_id = teacher.id, "teacher registered");
        Ok(teacher)
    }

    /// Load one teacher
    pub async fn get_teacher(&self, id: i64) -> Result<Teacher> {
        self.teachers
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("teacher id {id}")))
    }

    /// Apply a partial update to a teacher
    #[instrument(skip(self, update))]
    pub async fn update_teacher(&self, id: i64, update: TeacherUpdate) -> Result<Teacher> {
        if !self.teachers.update(id, update).await? {
            return Err(SemesterError::NotFound(format!("teacher id {id}")));
        }
        self.get_teacher(id).await
    }

    /// Remove a teacher record
    #[instrument(skip(self))]
    pub async fn delete_teacher(&self, id: i64) -> Result<()> {
        if !self.teachers.delete(id).await? {
            return Err(SemesterError::NotFound(format!("teacher id {id}")));
        }
        info!(teacher_id = id, "teacher deleted");
        Ok(())
    }

    /// List teachers, filtered and paginated
    pub async fn list_teachers(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Teacher>> {
        self.teachers.list(filter, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_student, new_teacher, InMemoryStudents, InMemoryTeachers};

    fn service() -> (DirectoryService, Arc<InMemoryStudents>, Arc<InMemoryTeachers>) {
        let students = Arc::new(InMemoryStudents::default());
        let teachers = Arc::new(InMemoryTeachers::default());
        (DirectoryService::new(students.clone(), teachers.clone()), students, teachers)
    }

    #[tokio::test]
    async fn add_and_get_student() {
        let (service, _, _) = service();
        let created = service.add_student(new_student("ana@example.com")).await.unwrap();
        let fetched = service.get_student(created.id).await.unwrap();
        assert_eq!(fetched.email, "ana@example.com");
    }

    #[tokio::test]
    async fn duplicate_student_email_is_conflict() {
        let (service, _, _) = service();
        service.add_student(new_student("dup@example.com")).await.unwrap();
        let err = service.add_student(new_student("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, SemesterError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_student_is_not_found() {
        let (service, _, _) = service();
        let err = service
            .update_student(99, StudentUpdate { first_name: Some("Mia".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, SemesterError::NotFound(_)));
    }

    #[tokio::test]
    async fn partial_update_touches_only_set_fields() {
        let (service, _, _) = service();
        let created = service.add_student(new_student("kit@example.com")).await.unwrap();
        let updated = service
            .update_student(
                created.id,
                StudentUpdate { phone: Some("555-0000".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone, "555-0000");
        assert_eq!(updated.email, "kit@example.com");
        assert_eq!(updated.first_name, created.first_name);
    }

    #[tokio::test]
    async fn delete_teacher_then_get_is_not_found() {
        let (service, _, _) = service();
        let teacher = service.add_teacher(new_teacher("t@example.com", 20.0)).await.unwrap();
        service.delete_teacher(teacher.id).await.unwrap();
        let err = service.get_teacher(teacher.id).await.unwrap_err();
        assert!(matches!(err, SemesterError::NotFound(_)));
    }
}
