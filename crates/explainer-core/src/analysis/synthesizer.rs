//! Canned analyses used when no remote model is available

use explainer_shared::{AnalysisResult, Category, Improvement};

struct CannedImprovement {
    title: &'static str,
    description: &'static str,
    suggested_code: &'static str,
    confidence: f32,
}

struct CannedAnalysis {
    explanation: &'static str,
    improvements: &'static [CannedImprovement],
    bugs: &'static [&'static str],
}

impl CannedAnalysis {
    fn to_result(&self) -> AnalysisResult {
        AnalysisResult {
            explanation: self.explanation.to_string(),
            improvements: self
                .improvements
                .iter()
                .map(|i| Improvement::new(i.title, i.description, i.suggested_code, i.confidence))
                .collect(),
            potential_bugs: self.bugs.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// Deterministic analysis for `category`
pub fn synthesize(category: Category) -> AnalysisResult {
    canned(category).to_result()
}

fn canned(category: Category) -> &'static CannedAnalysis {
    match category {
        Category::RestController => &REST_CONTROLLER,
        Category::WebRoute => &WEB_ROUTE,
        Category::ReactiveUi => &REACTIVE_UI,
        Category::SqlQuery => &SQL_QUERY,
        Category::GenericFunction => &GENERIC_FUNCTION,
        Category::Unclassified => &UNCLASSIFIED,
    }
}

static REST_CONTROLLER: CannedAnalysis = CannedAnalysis {
    explanation: "## REST API Controller Analysis\n\n\
This is a Spring Boot REST controller that handles HTTP requests and exposes API endpoints to client applications.\n\n\
**Architecture Pattern:** MVC (Model-View-Controller)\n\
**HTTP Methods:** GET/POST/PUT/DELETE handlers\n\
**Data Flow:** Request -> Controller -> Service -> Repository -> Database",
    improvements: &[
        CannedImprovement {
            title: "Add Input Validation",
            description: "Validate request bodies with @Valid and bean validation constraints",
            suggested_code: "@PostMapping\n\
public ResponseEntity<Product> createProduct(@Valid @RequestBody ProductDto productDto) {\n    \
Product product = productService.createProduct(productDto);\n    \
return ResponseEntity.status(HttpStatus.CREATED).body(product);\n}",
            confidence: 0.95,
        },
        CannedImprovement {
            title: "Implement Global Exception Handler",
            description: "Centralize error handling for consistent API responses",
            suggested_code: "@ControllerAdvice\n\
public class GlobalExceptionHandler {\n    \
@ExceptionHandler(ValidationException.class)\n    \
public ResponseEntity<ErrorResponse> handleValidation(ValidationException ex) {\n        \
return ResponseEntity.badRequest().body(new ErrorResponse(ex.getMessage()));\n    }\n}",
            confidence: 0.90,
        },
        CannedImprovement {
            title: "Add Response DTOs",
            description: "Return transfer objects instead of entities to control the response shape",
            suggested_code: "public class ProductResponseDto {\n    \
private Long id;\n    private String name;\n    private BigDecimal price;\n}",
            confidence: 0.88,
        },
    ],
    bugs: &[
        "Missing null checks could cause NullPointerException",
        "No rate limiting - API vulnerable to abuse",
        "Direct entity exposure in responses leaks internal structure",
    ],
};

static WEB_ROUTE: CannedAnalysis = CannedAnalysis {
    explanation: "## Flask Web Application Analysis\n\n\
This is a Flask route handler. Flask is a lightweight Python framework for APIs and web applications.\n\n\
**Framework:** Flask (micro-framework)\n\
**Pattern:** Route-based URL handling\n\
**Use Case:** RESTful API or web endpoint",
    improvements: &[
        CannedImprovement {
            title: "Add Request Validation",
            description: "Validate payloads with a Marshmallow or Pydantic schema",
            suggested_code: "class UserSchema(Schema):\n    \
name = fields.Str(required=True)\n    email = fields.Email(required=True)\n\n\
@app.route('/users', methods=['POST'])\n\
def create_user():\n    \
try:\n        data = UserSchema().load(request.json)\n    \
except ValidationError as err:\n        return jsonify(err.messages), 400",
            confidence: 0.92,
        },
        CannedImprovement {
            title: "Add Error Handling",
            description: "Register error handlers and log server failures",
            suggested_code: "@app.errorhandler(500)\n\
def internal_error(error):\n    \
app.logger.error(f'Server Error: {error}')\n    \
return jsonify({'error': 'Internal server error'}), 500",
            confidence: 0.89,
        },
        CannedImprovement {
            title: "Environment Configuration",
            description: "Read secrets and connection strings from the environment",
            suggested_code: "app = Flask(__name__)\n\
app.config['SQLALCHEMY_DATABASE_URI'] = os.getenv('DATABASE_URL', 'sqlite:///default.db')\n\
app.config['SECRET_KEY'] = os.environ['SECRET_KEY']",
            confidence: 0.87,
        },
    ],
    bugs: &[
        "No CSRF protection for state-changing operations",
        "Missing input sanitization could lead to injection attacks",
        "Database connections not properly managed in production",
    ],
};

static REACTIVE_UI: CannedAnalysis = CannedAnalysis {
    explanation: "## React Component Analysis\n\n\
This is a React functional component that uses hooks for state and side effects.\n\n\
**Pattern:** Functional component with hooks\n\
**State Management:** useState for local state\n\
**Side Effects:** useEffect for lifecycle work",
    improvements: &[
        CannedImprovement {
            title: "Custom Hook Extraction",
            description: "Move data fetching into a reusable custom hook",
            suggested_code: "function useUsers() {\n  \
const [users, setUsers] = useState([]);\n  \
const [error, setError] = useState(null);\n\n  \
const fetchUsers = useCallback(async () => {\n    \
try {\n      const response = await fetch('/api/users');\n      \
if (!response.ok) throw new Error('Failed to fetch');\n      \
setUsers(await response.json());\n    \
} catch (err) {\n      setError(err.message);\n    }\n  }, []);\n\n  \
return { users, error, fetchUsers };\n}",
            confidence: 0.94,
        },
        CannedImprovement {
            title: "Error Boundary Implementation",
            description: "Wrap the component tree in an error boundary",
            suggested_code: "class ErrorBoundary extends React.Component {\n  \
state = { hasError: false };\n\n  \
static getDerivedStateFromError() {\n    return { hasError: true };\n  }\n\n  \
render() {\n    \
return this.state.hasError ? <h1>Something went wrong.</h1> : this.props.children;\n  }\n}",
            confidence: 0.88,
        },
        CannedImprovement {
            title: "Memoization Optimization",
            description: "Use React.memo and useMemo to avoid needless re-renders",
            suggested_code: "const UserList = React.memo(({ users }) => {\n  \
const sorted = useMemo(\n    () => [...users].sort((a, b) => a.name.localeCompare(b.name)),\n    [users]\n  );\n  \
return <ul>{sorted.map(u => <li key={u.id}>{u.name}</li>)}</ul>;\n});",
            confidence: 0.86,
        },
    ],
    bugs: &[
        "Missing dependency array in useEffect could cause infinite re-renders",
        "No cleanup function for async operations may cause memory leaks",
        "Missing key props in list rendering affects performance",
    ],
};

static SQL_QUERY: CannedAnalysis = CannedAnalysis {
    explanation: "## SQL Database Query Analysis\n\n\
This SQL code retrieves, modifies or defines data. Query shape and indexing usually decide application performance.\n\n\
**Operation Type:** Data query/manipulation\n\
**Performance Impact:** Database operations are common bottlenecks\n\
**Best Practices:** Indexing, query optimization, parameter binding",
    improvements: &[
        CannedImprovement {
            title: "Add Database Indexes",
            description: "Index columns used in filters and joins",
            suggested_code: "CREATE INDEX idx_users_email ON users(email);\n\
CREATE INDEX idx_orders_user_id ON orders(user_id);\n\
CREATE INDEX idx_orders_user_status ON orders(user_id, status);",
            confidence: 0.93,
        },
        CannedImprovement {
            title: "Parameterized Queries",
            description: "Bind parameters instead of concatenating strings",
            suggested_code: "String sql = \"SELECT * FROM users WHERE email = ? AND status = ?\";\n\
PreparedStatement stmt = connection.prepareStatement(sql);\n\
stmt.setString(1, userEmail);\n\
stmt.setString(2, \"active\");",
            confidence: 0.96,
        },
        CannedImprovement {
            title: "Query Optimization",
            description: "Add constraints and join only the rows you need",
            suggested_code: "ALTER TABLE orders ADD CONSTRAINT fk_orders_user\n  \
FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE;\n\n\
SELECT u.name, COUNT(o.id) AS order_count\n\
FROM users u\n\
LEFT JOIN orders o ON u.id = o.user_id AND o.status = 'completed'\n\
GROUP BY u.id, u.name;",
            confidence: 0.91,
        },
    ],
    bugs: &[
        "Missing foreign key constraints could lead to data integrity issues",
        "No indexes on join columns will cause slow query performance",
        "Potential for SQL injection if using dynamic query building",
    ],
};

static GENERIC_FUNCTION: CannedAnalysis = CannedAnalysis {
    explanation: "## Code Function Analysis\n\n\
This code defines a function or method that encapsulates a piece of business logic.\n\n\
**Code Structure:** Function/method definition\n\
**Best Practices:** Single responsibility, clear naming, explicit error handling\n\
**Maintainability:** Keep it testable and reusable",
    improvements: &[
        CannedImprovement {
            title: "Add Input Validation",
            description: "Reject invalid parameters before doing any work",
            suggested_code: "public String processUserData(String userData) {\n    \
if (userData == null || userData.trim().isEmpty()) {\n        \
throw new IllegalArgumentException(\"User data cannot be null or empty\");\n    }\n    \
return userData.trim().toLowerCase();\n}",
            confidence: 0.92,
        },
        CannedImprovement {
            title: "Improve Error Handling",
            description: "Catch expected failures, log them and rethrow with context",
            suggested_code: "public Result processData(String input) {\n    \
try {\n        return new Result(transform(input));\n    \
} catch (ValidationException e) {\n        \
logger.warning(\"Validation failed: \" + e.getMessage());\n        throw e;\n    \
} catch (Exception e) {\n        \
throw new ProcessingException(\"Failed to process data\", e);\n    }\n}",
            confidence: 0.89,
        },
        CannedImprovement {
            title: "Extract to Smaller Methods",
            description: "Split long functions into focused, testable steps",
            suggested_code: "public User createUser(UserRequest request) {\n    \
validateUserRequest(request);\n    \
User user = buildUserFromRequest(request);\n    \
return saveUser(user);\n}",
            confidence: 0.87,
        },
    ],
    bugs: &[
        "Missing null checks could cause NullPointerException",
        "No input sanitization may lead to security vulnerabilities",
        "Lack of error handling could cause application crashes",
    ],
};

static UNCLASSIFIED: CannedAnalysis = CannedAnalysis {
    explanation: "## Code Analysis\n\n\
This code appears to handle core application logic. Below are general observations and improvements.\n\n\
**Code Quality:** Follows common programming conventions\n\
**Maintainability:** Consider refactoring for clearer organization\n\
**Performance:** Review for optimization opportunities",
    improvements: &[
        CannedImprovement {
            title: "Add Documentation",
            description: "Document intent, parameters and failure modes",
            suggested_code: "/**\n * Processes user input and returns a normalized result.\n \
* @param input the raw user input\n * @return the trimmed, lower-cased input\n \
* @throws IllegalArgumentException if input is null\n */\n\
public String processInput(String input) {\n    \
if (input == null) {\n        throw new IllegalArgumentException(\"Input cannot be null\");\n    }\n    \
return input.trim().toLowerCase();\n}",
            confidence: 0.85,
        },
        CannedImprovement {
            title: "Implement Unit Tests",
            description: "Cover the happy path and the edge cases with unit tests",
            suggested_code: "@Test\n\
public void processInput_trimsAndLowercases() {\n    \
assertEquals(\"test input\", processor.processInput(\"  TEST INPUT  \"));\n}\n\n\
@Test(expected = IllegalArgumentException.class)\n\
public void processInput_rejectsNull() {\n    processor.processInput(null);\n}",
            confidence: 0.88,
        },
        CannedImprovement {
            title: "Add Logging",
            description: "Log progress and failures for debugging and monitoring",
            suggested_code: "private static final Logger log = LoggerFactory.getLogger(DataProcessor.class);\n\n\
public void processData(String data) {\n    \
log.debug(\"Starting data processing\");\n    \
try {\n        transform(data);\n    \
} catch (Exception e) {\n        \
log.error(\"Error processing data: {}\", e.getMessage(), e);\n        throw e;\n    }\n}",
            confidence: 0.83,
        },
    ],
    bugs: &[
        "Potential resource leaks if not properly managed",
        "Missing edge case handling for boundary conditions",
        "Insufficient error recovery mechanisms",
    ],
};
